//! Forward/inverse Fourier transform on X/Y data
//!
//! Frequency axes follow the usual DFT bin conventions: two-sided spectra
//! with negative frequencies in the upper half, optionally rotated to put
//! the zero-frequency bin at the center.

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::error::{check_min_length, check_same_length, Result};

/// DFT sample frequencies for `n` samples spaced `d` apart.
///
/// Bin `k` maps to `k/(n*d)` for the first half and to the mirrored negative
/// frequencies for the second half.
pub fn fftfreq(n: usize, d: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * d);
    let split = (n + 1) / 2;
    let mut freqs = Vec::with_capacity(n);
    for k in 0..split {
        freqs.push(k as f64 * scale);
    }
    for k in split..n {
        freqs.push((k as f64 - n as f64) * scale);
    }
    freqs
}

/// Rotate a spectrum so the zero-frequency bin sits at the center.
pub fn fftshift<T: Copy>(y: &[T]) -> Vec<T> {
    let split = (y.len() + 1) / 2;
    let mut out = Vec::with_capacity(y.len());
    out.extend_from_slice(&y[split..]);
    out.extend_from_slice(&y[..split]);
    out
}

/// Undo [`fftshift`].
pub fn ifftshift<T: Copy>(y: &[T]) -> Vec<T> {
    let split = y.len() / 2;
    let mut out = Vec::with_capacity(y.len());
    out.extend_from_slice(&y[split..]);
    out.extend_from_slice(&y[..split]);
    out
}

/// Compute the forward DFT of real Y data.
///
/// # Arguments
/// * `x` - X data (approximately uniform spacing)
/// * `y` - Y data, same length as `x`
/// * `shift` - Center the zero-frequency bin on both axes
///
/// # Returns
/// Frequency axis and complex spectrum
pub fn fft1d(x: &[f64], y: &[f64], shift: bool) -> Result<(Vec<f64>, Vec<Complex64>)> {
    check_same_length(x.len(), y.len())?;
    check_min_length(x.len(), 2)?;

    let n = y.len();
    let mut buf: Vec<Complex64> = y.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buf);

    let freqs = fftfreq(n, x[1] - x[0]);
    if shift {
        Ok((fftshift(&freqs), fftshift(&buf)))
    } else {
        Ok((freqs, buf))
    }
}

/// Compute the inverse DFT of a spectrum.
///
/// The time axis is rebuilt as `t[k] = k * dt` with
/// `dt = 1 / (x_span + step)`, which assumes the original signal was
/// periodic over `x[-1] - x[0] + step`. Only the real part of the inverse
/// transform is returned; the imaginary residue is numerical noise for
/// spectra of real signals.
///
/// # Arguments
/// * `x` - Frequency axis
/// * `y` - Complex spectrum, same length as `x`
/// * `shift` - Undo the zero-frequency centering before transforming
pub fn ifft1d(x: &[f64], y: &[Complex64], shift: bool) -> Result<(Vec<f64>, Vec<f64>)> {
    check_same_length(x.len(), y.len())?;
    check_min_length(x.len(), 2)?;

    let n = y.len();
    let mut buf = if shift { ifftshift(y) } else { y.to_vec() };
    FftPlanner::new().plan_fft_inverse(n).process(&mut buf);

    // rustfft leaves the inverse unnormalized
    let scale = 1.0 / n as f64;
    let y1: Vec<f64> = buf.iter().map(|c| c.re * scale).collect();

    let dt = 1.0 / (x[n - 1] - x[0] + (x[1] - x[0]));
    let x1: Vec<f64> = (0..n).map(|k| k as f64 * dt).collect();
    Ok((x1, y1))
}

/// Compute the magnitude spectrum, zero frequency centered.
///
/// # Arguments
/// * `log_scale` - Return `20 * log10(|Y|)` instead of `|Y|`
pub fn magnitude_spectrum(x: &[f64], y: &[f64], log_scale: bool) -> Result<(Vec<f64>, Vec<f64>)> {
    let (x1, y1) = fft1d(x, y, true)?;
    let mag: Vec<f64> = if log_scale {
        // Clamp to avoid log(0) on empty bins
        y1.iter()
            .map(|c| 20.0 * c.norm().max(1e-20).log10())
            .collect()
    } else {
        y1.iter().map(|c| c.norm()).collect()
    };
    Ok((x1, mag))
}

/// Compute the phase spectrum in degrees, zero frequency centered.
pub fn phase_spectrum(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let (x1, y1) = fft1d(x, y, true)?;
    let phase = y1.iter().map(|c| c.arg().to_degrees()).collect();
    Ok((x1, phase))
}

/// Return the unshifted frequency axis reordered by ascending magnitude of
/// the corresponding Fourier coefficient.
///
/// This ranks frequencies by spectral energy (most energetic last); it does
/// not sort the axis by frequency value.
pub fn sort_frequencies(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    let (freqs, fourier) = fft1d(x, y, false)?;
    let mut order: Vec<usize> = (0..freqs.len()).collect();
    order.sort_by(|&a, &b| {
        fourier[a]
            .norm()
            .partial_cmp(&fourier[b].norm())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(order.into_iter().map(|i| freqs[i]).collect())
}

/// Magnitude spectrum of `y` alone, no axis bookkeeping. Used for
/// initial-guess frequency estimation and the distortion metrics.
pub(crate) fn fft_magnitude(y: &[f64]) -> Vec<f64> {
    let n = y.len();
    let mut buf: Vec<Complex64> = y.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buf);
    buf.iter().map(|c| c.norm()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine_signal(n: usize, freq: f64, span: f64) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| span * i as f64 / n as f64).collect();
        let y: Vec<f64> = x.iter().map(|&t| (2.0 * PI * freq * t).sin()).collect();
        (x, y)
    }

    #[test]
    fn test_fftfreq_even() {
        let freqs = fftfreq(4, 0.5);
        assert_eq!(freqs, vec![0.0, 0.5, -1.0, -0.5]);
    }

    #[test]
    fn test_fftfreq_odd() {
        let freqs = fftfreq(5, 1.0);
        assert_eq!(freqs, vec![0.0, 0.2, 0.4, -0.4, -0.2]);
    }

    #[test]
    fn test_shift_round_trip() {
        for n in [8usize, 9] {
            let v: Vec<f64> = (0..n).map(|i| i as f64).collect();
            assert_eq!(ifftshift(&fftshift(&v)), v);
        }
    }

    #[test]
    fn test_fft_peak_bin() {
        let (x, y) = sine_signal(128, 4.0, 1.0);
        let (freqs, spec) = fft1d(&x, &y, false).unwrap();

        let (peak, _) = spec
            .iter()
            .take(64)
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .unwrap();
        assert!((freqs[peak] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_fft_ifft_round_trip() {
        let (x, y) = sine_signal(64, 3.0, 2.0);
        let (fx, fy) = fft1d(&x, &y, false).unwrap();
        let (_, ty) = ifft1d(&fx, &fy, false).unwrap();

        assert_eq!(ty.len(), y.len());
        for (a, b) in ty.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fft_ifft_round_trip_shifted() {
        let (x, y) = sine_signal(32, 2.0, 1.0);
        let (fx, fy) = fft1d(&x, &y, true).unwrap();
        let (tx, ty) = ifft1d(&fx, &fy, true).unwrap();

        for (a, b) in ty.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
        // The ascending frequency axis spans 1/dt, so the rebuilt time axis
        // starts at zero with the original step
        assert_eq!(tx[0], 0.0);
        assert!((tx[1] - (x[1] - x[0])).abs() < 1e-9);
    }

    #[test]
    fn test_magnitude_spectrum_db() {
        let (x, y) = sine_signal(64, 2.0, 1.0);
        let (_, lin) = magnitude_spectrum(&x, &y, false).unwrap();
        let (_, db) = magnitude_spectrum(&x, &y, true).unwrap();

        let k = lin
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!((db[k] - 20.0 * lin[k].log10()).abs() < 1e-9);
    }

    #[test]
    fn test_phase_spectrum_in_degrees() {
        let (x, y) = sine_signal(64, 2.0, 1.0);
        let (_, phase) = phase_spectrum(&x, &y).unwrap();
        for &p in &phase {
            assert!((-180.0..=180.0).contains(&p));
        }
    }

    #[test]
    fn test_sort_frequencies_most_energetic_last() {
        let (x, y) = sine_signal(128, 4.0, 1.0);
        let ranked = sort_frequencies(&x, &y).unwrap();
        // The two most energetic bins are the +/-4 Hz pair
        let top: Vec<f64> = ranked[ranked.len() - 2..].to_vec();
        assert!(top.iter().any(|&f| (f - 4.0).abs() < 1e-9));
        assert!(top.iter().any(|&f| (f + 4.0).abs() < 1e-9));
    }
}
