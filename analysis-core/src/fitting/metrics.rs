//! Dynamic-range metrics for digitized sinusoids
//!
//! ENOB, SINAD, THD, SFDR and SNR, all derived from a least-squares
//! sinusoidal fit of the record. Amplitude-ratio results are expressed
//! either relative to the carrier (dBc) or to the converter full scale
//! (dBFS).

use std::f64::consts::SQRT_2;
use std::str::FromStr;

use crate::error::{Result, SignalError};
use crate::spectrum::fft::fft_magnitude;

use super::sine::sinusoidal_fit;

/// Reference for amplitude-ratio metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmplitudeUnit {
    /// Relative to the fitted carrier amplitude
    DBc,
    /// Relative to the full-scale range
    DBFS,
}

impl FromStr for AmplitudeUnit {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dBc" => Ok(Self::DBc),
            "dBFS" => Ok(Self::DBFS),
            other => Err(SignalError::InvalidParameter(format!(
                "unsupported amplitude unit '{other}'"
            ))),
        }
    }
}

/// Effective number of bits of a digitized sinusoid.
///
/// The fit residual is treated as quantization noise of an ideal
/// `full_scale` converter, whose RMS is `q / sqrt(12)` per LSB.
pub fn enob(x: &[f64], y: &[f64], full_scale: f64) -> Result<f64> {
    let fit = sinusoidal_fit(x, y)?;
    Ok(-(fit.residual_std * 12f64.sqrt() / full_scale).log2())
}

/// Signal-to-noise-and-distortion ratio, in dB.
pub fn sinad(x: &[f64], y: &[f64], full_scale: f64, unit: AmplitudeUnit) -> Result<f64> {
    let fit = sinusoidal_fit(x, y)?;
    let powf = match unit {
        AmplitudeUnit::DBc => fit.amplitude.abs() / SQRT_2,
        AmplitudeUnit::DBFS => full_scale / (2.0 * SQRT_2),
    };
    Ok(20.0 * (powf / fit.residual_std).log10())
}

/// Total harmonic distortion, in dB.
///
/// Harmonic amplitudes are read off the FFT of the mean-removed record:
/// for each harmonic order the tallest bin within 5 bins of the expected
/// position is taken, which absorbs spectral leakage of non-coherent
/// records.
///
/// # Arguments
/// * `nb_harm` - Number of harmonics to accumulate, fundamental excluded
pub fn thd(
    x: &[f64],
    y: &[f64],
    full_scale: f64,
    unit: AmplitudeUnit,
    nb_harm: usize,
) -> Result<f64> {
    let fit = sinusoidal_fit(x, y)?;
    let n = y.len();

    let mean = y.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = y.iter().map(|&v| v - mean).collect();
    let ampfft = fft_magnitude(&centered);

    let powfund = match unit {
        AmplitudeUnit::DBc => ampfft[..n / 2]
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max),
        AmplitudeUnit::DBFS => full_scale / (2.0 * SQRT_2) * (n as f64 / SQRT_2),
    };

    // Fundamental bin from the fitted frequency and the record span
    let span = x[n - 1] - x[0];
    let fund_bin = (fit.frequency.abs() * span).ceil() as usize;

    let mut sumharm = 0.0;
    for h in 2..=nb_harm + 1 {
        let center = h * fund_bin;
        // A window reaching below bin 0 skips the harmonic entirely rather
        // than sliding onto the DC/fundamental bins
        if center < 5 {
            continue;
        }
        let lo = (center - 5).min(n);
        let hi = (center + 5).min(n);
        if lo < hi {
            sumharm += ampfft[lo..hi].iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        }
    }
    Ok(20.0 * (sumharm / powfund).log10())
}

/// Spurious-free dynamic range, in dB.
///
/// The largest spectral spike of the fit residual is compared against the
/// fundamental (or the full-scale carrier).
pub fn sfdr(x: &[f64], y: &[f64], full_scale: f64, unit: AmplitudeUnit) -> Result<f64> {
    let fit = sinusoidal_fit(x, y)?;
    let n = y.len();

    let powfund = match unit {
        AmplitudeUnit::DBc => fft_magnitude(y).iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        AmplitudeUnit::DBFS => full_scale / (2.0 * SQRT_2) * (n as f64 / SQRT_2),
    };

    let resid: Vec<f64> = x.iter().zip(y.iter()).map(|(&xi, &yi)| yi - fit.eval(xi)).collect();
    let maxspike = fft_magnitude(&resid)
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    Ok(20.0 * (powfund / maxspike).log10())
}

/// Signal-to-noise ratio, in dB, with the noise taken as the RMS of the
/// fit residual. The fundamental power uses the same spectral-magnitude
/// reference as [`sfdr`].
pub fn snr(x: &[f64], y: &[f64], full_scale: f64, unit: AmplitudeUnit) -> Result<f64> {
    let fit = sinusoidal_fit(x, y)?;
    let n = y.len();

    let powfund = match unit {
        AmplitudeUnit::DBc => fft_magnitude(y).iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        AmplitudeUnit::DBFS => full_scale / (2.0 * SQRT_2) * (n as f64 / SQRT_2),
    };

    let noise = (x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| {
            let r = yi - fit.eval(xi);
            r * r
        })
        .sum::<f64>()
        / n as f64)
        .sqrt();
    Ok(20.0 * (powfund / noise).log10())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::sine::sinusoidal_model;

    fn sine_with_harmonic(n: usize, h3: f64) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&t| {
                sinusoidal_model(t, 1.0, 10.0, 0.0, 0.0)
                    + h3 * sinusoidal_model(t, 1.0, 30.0, 0.0, 0.0)
            })
            .collect();
        (x, y)
    }

    #[test]
    fn test_enob_of_clean_sinusoid_is_high() {
        let (x, y) = sine_with_harmonic(512, 0.0);
        assert!(enob(&x, &y, 2.0).unwrap() > 20.0);
    }

    #[test]
    fn test_enob_tracks_quantization() {
        // Quantize to 8 bits over a [-1, 1] full scale
        let (x, y) = sine_with_harmonic(4096, 0.0);
        let q = 2.0 / 256.0;
        let yq: Vec<f64> = y.iter().map(|v| (v / q).round() * q).collect();
        let bits = enob(&x, &yq, 2.0).unwrap();
        assert!(bits > 6.5 && bits < 9.5, "got {bits}");
    }

    #[test]
    fn test_sinad_units_differ_by_headroom() {
        // Carrier at half of full scale: dBFS reads 6 dB above dBc
        let (x, y) = sine_with_harmonic(1024, 0.001);
        let dbc = sinad(&x, &y, 4.0, AmplitudeUnit::DBc).unwrap();
        let dbfs = sinad(&x, &y, 4.0, AmplitudeUnit::DBFS).unwrap();
        assert!((dbfs - dbc - 20.0 * 2f64.log10()).abs() < 0.1);
    }

    #[test]
    fn test_thd_sees_injected_harmonic() {
        // Third harmonic at -40 dBc
        let (x, y) = sine_with_harmonic(1024, 0.01);
        let d = thd(&x, &y, 2.0, AmplitudeUnit::DBc, 5).unwrap();
        assert!((d + 40.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_sfdr_sees_injected_harmonic() {
        let (x, y) = sine_with_harmonic(1024, 0.01);
        let d = sfdr(&x, &y, 2.0, AmplitudeUnit::DBc).unwrap();
        assert!((d - 40.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_snr_of_clean_sinusoid_is_high() {
        let (x, y) = sine_with_harmonic(512, 0.0);
        assert!(snr(&x, &y, 2.0, AmplitudeUnit::DBc).unwrap() > 100.0);
    }

    #[test]
    fn test_snr_fundamental_reference_is_spectral_magnitude() {
        // Unit sine plus a -60 dB spur at a non-harmonic bin: the residual
        // RMS is spur/sqrt(2), the fundamental reads n/2 on the raw FFT, so
        // dBc comes out at 60 + 20*log10(n/sqrt(2))
        let n = 1024;
        let x: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&t| {
                sinusoidal_model(t, 1.0, 10.0, 0.0, 0.0)
                    + 0.001 * sinusoidal_model(t, 1.0, 17.0, 0.0, 0.0)
            })
            .collect();

        let d = snr(&x, &y, 2.0, AmplitudeUnit::DBc).unwrap();
        let expected = 60.0 + 20.0 * (n as f64 / 2f64.sqrt()).log10();
        assert!((d - expected).abs() < 0.5, "got {d}, expected {expected}");
    }

    #[test]
    fn test_thd_low_fundamental_skips_out_of_range_harmonics() {
        // One cycle over the record: fundamental bin 1, so every harmonic
        // window would reach below bin 0 and is skipped
        let n = 64;
        let x: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&t| sinusoidal_model(t, 1.0, 1.0, 0.0, 0.0))
            .collect();

        let d = thd(&x, &y, 2.0, AmplitudeUnit::DBc, 3).unwrap();
        assert!(d.is_infinite() && d.is_sign_negative(), "got {d}");
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("dBc".parse::<AmplitudeUnit>().unwrap(), AmplitudeUnit::DBc);
        assert_eq!("dBFS".parse::<AmplitudeUnit>().unwrap(), AmplitudeUnit::DBFS);
        assert!("dB".parse::<AmplitudeUnit>().is_err());
    }
}
