//! Window functions for spectral analysis
//!
//! Symmetric windows following the usual scipy/numpy definitions. Windows
//! that take a shape parameter carry it in their enum variant.

use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::{Result, SignalError};

/// Default Tukey taper fraction
pub const DEFAULT_TUKEY_ALPHA: f64 = 0.5;
/// Default Kaiser shape parameter
pub const DEFAULT_KAISER_BETA: f64 = 14.0;
/// Default Gaussian standard deviation (in samples)
pub const DEFAULT_GAUSSIAN_SIGMA: f64 = 7.0;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowKind {
    Barthann,
    Bartlett,
    Blackman,
    BlackmanHarris,
    Bohman,
    /// Identity window (all ones)
    Boxcar,
    Cosine,
    Exponential,
    FlatTop,
    Hamming,
    Hanning,
    Lanczos,
    Nuttall,
    Parzen,
    /// Alias of `Boxcar`
    Rectangular,
    /// Taylor window, nbar = 4, 30 dB sidelobe level, normalized
    Taylor,
    /// Tapered cosine; the parameter is the taper fraction alpha
    Tukey(f64),
    /// Kaiser window; the parameter is the shape factor beta
    Kaiser(f64),
    /// Gaussian window; the parameter is sigma in samples
    Gaussian(f64),
}

impl FromStr for WindowKind {
    type Err = SignalError;

    /// Parse a window name; parameterized windows get their default
    /// parameter (`tukey` 0.5, `kaiser` 14, `gaussian` 7).
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "barthann" => Ok(Self::Barthann),
            "bartlett" => Ok(Self::Bartlett),
            "blackman" => Ok(Self::Blackman),
            "blackman-harris" => Ok(Self::BlackmanHarris),
            "bohman" => Ok(Self::Bohman),
            "boxcar" => Ok(Self::Boxcar),
            "cosine" => Ok(Self::Cosine),
            "exponential" => Ok(Self::Exponential),
            "flat-top" => Ok(Self::FlatTop),
            "hamming" => Ok(Self::Hamming),
            "hanning" => Ok(Self::Hanning),
            "lanczos" => Ok(Self::Lanczos),
            "nuttall" => Ok(Self::Nuttall),
            "parzen" => Ok(Self::Parzen),
            "rectangular" => Ok(Self::Rectangular),
            "taylor" => Ok(Self::Taylor),
            "tukey" => Ok(Self::Tukey(DEFAULT_TUKEY_ALPHA)),
            "kaiser" => Ok(Self::Kaiser(DEFAULT_KAISER_BETA)),
            "gaussian" => Ok(Self::Gaussian(DEFAULT_GAUSSIAN_SIGMA)),
            other => Err(SignalError::InvalidParameter(format!(
                "unsupported window type '{other}'"
            ))),
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `kind` - Window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(kind: WindowKind, length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    if length == 1 {
        return vec![1.0];
    }
    let m = length as f64;

    match kind {
        WindowKind::Barthann => (0..length)
            .map(|n| {
                let fac = (n as f64 / (m - 1.0) - 0.5).abs();
                0.62 - 0.48 * fac + 0.38 * (2.0 * PI * fac).cos()
            })
            .collect(),

        WindowKind::Bartlett => (0..length)
            .map(|n| 1.0 - (2.0 * n as f64 / (m - 1.0) - 1.0).abs())
            .collect(),

        WindowKind::Blackman => (0..length)
            .map(|n| {
                let a = 2.0 * PI * n as f64 / (m - 1.0);
                0.42 - 0.5 * a.cos() + 0.08 * (2.0 * a).cos()
            })
            .collect(),

        WindowKind::BlackmanHarris => {
            cosine_sum(length, &[0.35875, -0.48829, 0.14128, -0.01168])
        }

        WindowKind::Bohman => (0..length)
            .map(|n| {
                let fac = (2.0 * n as f64 / (m - 1.0) - 1.0).abs();
                (1.0 - fac) * (PI * fac).cos() + (PI * fac).sin() / PI
            })
            .collect(),

        WindowKind::Boxcar | WindowKind::Rectangular => vec![1.0; length],

        WindowKind::Cosine => (0..length)
            .map(|n| (PI * (n as f64 + 0.5) / m).sin())
            .collect(),

        WindowKind::Exponential => {
            // Symmetric two-sided decay about the window center, tau = 1
            let center = (m - 1.0) / 2.0;
            (0..length)
                .map(|n| (-(n as f64 - center).abs()).exp())
                .collect()
        }

        WindowKind::FlatTop => cosine_sum(
            length,
            &[
                0.21557895,
                -0.41663158,
                0.277263158,
                -0.083578947,
                0.006947368,
            ],
        ),

        WindowKind::Hamming => (0..length)
            .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / (m - 1.0)).cos())
            .collect(),

        WindowKind::Hanning => (0..length)
            .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / (m - 1.0)).cos())
            .collect(),

        WindowKind::Lanczos => (0..length)
            .map(|n| sinc(2.0 * n as f64 / (m - 1.0) - 1.0))
            .collect(),

        WindowKind::Nuttall => {
            cosine_sum(length, &[0.3635819, -0.4891775, 0.1365995, -0.0106411])
        }

        WindowKind::Parzen => {
            let half = m / 2.0;
            (0..length)
                .map(|n| {
                    let d = (n as f64 - (m - 1.0) / 2.0).abs();
                    let r = d / half;
                    if d <= (m - 1.0) / 4.0 {
                        1.0 - 6.0 * r * r + 6.0 * r * r * r
                    } else {
                        2.0 * (1.0 - r).powi(3)
                    }
                })
                .collect()
        }

        WindowKind::Taylor => taylor_window(length, 4, 30.0),

        WindowKind::Tukey(alpha) => {
            if alpha <= 0.0 {
                return vec![1.0; length];
            }
            if alpha >= 1.0 {
                return generate_window(WindowKind::Hanning, length);
            }
            let width = alpha * (m - 1.0) / 2.0;
            (0..length)
                .map(|n| {
                    let n = n as f64;
                    if n < width {
                        0.5 * (1.0 + (PI * (2.0 * n / (alpha * (m - 1.0)) - 1.0)).cos())
                    } else if n <= (m - 1.0) - width {
                        1.0
                    } else {
                        0.5 * (1.0
                            + (PI * (2.0 * n / (alpha * (m - 1.0)) - 2.0 / alpha + 1.0)).cos())
                    }
                })
                .collect()
        }

        WindowKind::Kaiser(beta) => {
            let denom = bessel_i0(beta);
            (0..length)
                .map(|n| {
                    let r = 2.0 * n as f64 / (m - 1.0) - 1.0;
                    bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
                })
                .collect()
        }

        WindowKind::Gaussian(sigma) => {
            let center = (m - 1.0) / 2.0;
            (0..length)
                .map(|n| {
                    let d = (n as f64 - center) / sigma;
                    (-0.5 * d * d).exp()
                })
                .collect()
        }
    }
}

/// Apply a window to a signal (elementwise multiply).
pub fn windowing(y: &[f64], kind: WindowKind) -> Vec<f64> {
    let window = generate_window(kind, y.len());
    y.iter().zip(window.iter()).map(|(&s, &w)| s * w).collect()
}

/// Generalized cosine-sum window: `sum_k a[k] * cos(2*pi*k*n/(M-1))`.
fn cosine_sum(length: usize, coeffs: &[f64]) -> Vec<f64> {
    let m = length as f64;
    (0..length)
        .map(|n| {
            let base = 2.0 * PI * n as f64 / (m - 1.0);
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &a)| a * (k as f64 * base).cos())
                .sum()
        })
        .collect()
}

/// Normalized sinc `sin(pi x) / (pi x)`.
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-15 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Modified Bessel function of the first kind, order zero (power series).
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..64 {
        term *= (half / k as f64) * (half / k as f64);
        sum += term;
        if term < sum * 1e-16 {
            break;
        }
    }
    sum
}

/// Taylor window with `nbar` constant-level sidelobes at `sll` dB, peak
/// normalized to one.
fn taylor_window(length: usize, nbar: usize, sll: f64) -> Vec<f64> {
    let m = length as f64;
    let b = 10f64.powf(sll / 20.0);
    let a = (b + (b * b - 1.0).sqrt()).ln() / PI;
    let nb = nbar as f64;
    let s2 = nb * nb / (a * a + (nb - 0.5) * (nb - 0.5));

    // Fourier coefficients F_m for m = 1..nbar-1
    let mut fm = vec![0.0; nbar - 1];
    for (mi, f) in fm.iter_mut().enumerate() {
        let mf = (mi + 1) as f64;
        let sign = if mi % 2 == 0 { 1.0 } else { -1.0 };
        let mut numer = sign;
        for j in 1..nbar {
            let jf = j as f64;
            numer *= 1.0 - mf * mf / s2 / (a * a + (jf - 0.5) * (jf - 0.5));
        }
        let mut denom = 2.0;
        for j in 1..nbar {
            if j != mi + 1 {
                let jf = j as f64;
                denom *= 1.0 - mf * mf / (jf * jf);
            }
        }
        *f = numer / denom;
    }

    let w_at = |n: f64| -> f64 {
        1.0 + 2.0
            * fm.iter()
                .enumerate()
                .map(|(mi, &f)| {
                    f * (2.0 * PI * (mi + 1) as f64 * (n - m / 2.0 + 0.5) / m).cos()
                })
                .sum::<f64>()
    };

    let scale = 1.0 / w_at((m - 1.0) / 2.0);
    (0..length).map(|n| w_at(n as f64) * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxcar_is_identity() {
        let y = vec![1.0; 8];
        let out = windowing(&y, WindowKind::Boxcar);
        assert_eq!(out, vec![1.0; 8]);
    }

    #[test]
    fn test_symmetry() {
        for kind in [
            WindowKind::Barthann,
            WindowKind::Bartlett,
            WindowKind::Blackman,
            WindowKind::BlackmanHarris,
            WindowKind::Bohman,
            WindowKind::Cosine,
            WindowKind::Exponential,
            WindowKind::FlatTop,
            WindowKind::Hamming,
            WindowKind::Hanning,
            WindowKind::Lanczos,
            WindowKind::Nuttall,
            WindowKind::Parzen,
            WindowKind::Taylor,
            WindowKind::Tukey(0.5),
            WindowKind::Kaiser(14.0),
            WindowKind::Gaussian(7.0),
        ] {
            let w = generate_window(kind, 65);
            for i in 0..w.len() / 2 {
                assert!(
                    (w[i] - w[w.len() - 1 - i]).abs() < 1e-9,
                    "{kind:?} not symmetric at index {i}"
                );
            }
        }
    }

    #[test]
    fn test_center_values() {
        // Symmetric tapers peak at (or very near) one in the middle
        for kind in [
            WindowKind::Bartlett,
            WindowKind::Blackman,
            WindowKind::Hanning,
            WindowKind::Hamming,
            WindowKind::Lanczos,
            WindowKind::Parzen,
            WindowKind::Taylor,
            WindowKind::Kaiser(14.0),
            WindowKind::Gaussian(7.0),
        ] {
            let w = generate_window(kind, 101);
            assert!((w[50] - 1.0).abs() < 1e-9, "{kind:?} center is {}", w[50]);
        }
    }

    #[test]
    fn test_hanning_endpoints_zero() {
        let w = generate_window(WindowKind::Hanning, 33);
        assert!(w[0].abs() < 1e-12);
        assert!(w[32].abs() < 1e-12);
    }

    #[test]
    fn test_hamming_endpoints() {
        let w = generate_window(WindowKind::Hamming, 100);
        assert!(w[0] > 0.07 && w[0] < 0.09);
    }

    #[test]
    fn test_tukey_flat_region() {
        let w = generate_window(WindowKind::Tukey(0.5), 101);
        // Middle half of the window is exactly one
        assert_eq!(w[50], 1.0);
        assert_eq!(w[40], 1.0);
        assert!(w[0] < 1e-12);
    }

    #[test]
    fn test_tukey_degenerate_alphas() {
        assert_eq!(generate_window(WindowKind::Tukey(0.0), 16), vec![1.0; 16]);
        let hann = generate_window(WindowKind::Hanning, 16);
        let tukey = generate_window(WindowKind::Tukey(1.0), 16);
        for (a, b) in tukey.iter().zip(hann.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_kaiser_beta_zero_is_boxcar() {
        let w = generate_window(WindowKind::Kaiser(0.0), 16);
        for &v in &w {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bessel_i0_reference_values() {
        // I0(0) = 1, I0(1) = 1.2660658777520084
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-15);
        assert!((bessel_i0(1.0) - 1.2660658777520084).abs() < 1e-12);
    }

    #[test]
    fn test_window_from_str() {
        assert_eq!("boxcar".parse::<WindowKind>().unwrap(), WindowKind::Boxcar);
        assert_eq!(
            "tukey".parse::<WindowKind>().unwrap(),
            WindowKind::Tukey(DEFAULT_TUKEY_ALPHA)
        );
        assert!("welch".parse::<WindowKind>().is_err());
    }

    #[test]
    fn test_windowing_scales_signal() {
        let y = vec![2.0; 33];
        let out = windowing(&y, WindowKind::Hanning);
        assert!((out[16] - 2.0).abs() < 1e-9);
        assert!(out[0].abs() < 1e-12);
    }
}
