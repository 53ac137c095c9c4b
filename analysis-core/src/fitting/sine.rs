//! Sinusoidal model fitting
//!
//! The initial frequency guess comes from the tallest FFT bin of the
//! mean-removed signal, which makes the refinement robust against the
//! many local minima of the sinusoid's cost surface.

use std::f64::consts::PI;

use nalgebra::Vector4;

use crate::error::{check_min_length, check_same_length, Result};
use crate::spectrum::fft::fft_magnitude;

use super::lm::{levenberg_marquardt, FitOutcome};

/// Evaluate `a * sin(2 pi f x + phi) + offset`.
pub fn sinusoidal_model(x: f64, a: f64, f: f64, phi: f64, offset: f64) -> f64 {
    a * (2.0 * PI * f * x + phi).sin() + offset
}

/// Fitted sinusoid parameters plus fit diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct SinusoidFit {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub offset: f64,
    /// Standard deviation of the fit residual
    pub residual_std: f64,
    pub converged: bool,
    pub iterations: usize,
}

impl SinusoidFit {
    /// Evaluate the fitted model at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        sinusoidal_model(x, self.amplitude, self.frequency, self.phase, self.offset)
    }
}

/// Fit `y(x)` to a sinusoid by least squares.
///
/// The initial guess takes the offset from the mean, the amplitude from
/// half the data span, and the frequency from the tallest FFT bin (bins
/// above Nyquist are mirrored back onto their positive alias).
pub fn sinusoidal_fit(x: &[f64], y: &[f64]) -> Result<SinusoidFit> {
    check_same_length(x.len(), y.len())?;
    check_min_length(x.len(), 4)?;

    let n = y.len();
    let offset = y.iter().sum::<f64>() / n as f64;
    let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
    let amp = (max - min) / 2.0;

    let centered: Vec<f64> = y.iter().map(|&v| v - offset).collect();
    let mag = fft_magnitude(&centered);
    let mut i_max = mag
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);
    if i_max > n / 2 {
        i_max = n - i_max;
    }
    let freq = i_max as f64 / (x[n - 1] - x[0]);

    let outcome: FitOutcome = levenberg_marquardt(
        |p| {
            x.iter()
                .zip(y.iter())
                .map(|(&xi, &yi)| yi - sinusoidal_model(xi, p[0], p[1], p[2], p[3]))
                .collect()
        },
        Vector4::new(amp, freq, 0.0, offset),
    );
    let p = outcome.params;

    // Residual standard deviation about its own mean
    let resid: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| yi - sinusoidal_model(xi, p[0], p[1], p[2], p[3]))
        .collect();
    let rmean = resid.iter().sum::<f64>() / n as f64;
    let residual_std =
        (resid.iter().map(|r| (r - rmean) * (r - rmean)).sum::<f64>() / n as f64).sqrt();

    Ok(SinusoidFit {
        amplitude: p[0],
        frequency: p[1],
        phase: p[2],
        offset: p[3],
        residual_std,
        converged: outcome.converged,
        iterations: outcome.iterations,
    })
}

/// Frequency of the dominant sinusoid in `y(x)`.
pub fn sinus_frequency(x: &[f64], y: &[f64]) -> Result<f64> {
    Ok(sinusoidal_fit(x, y)?.frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(n: usize, amp: f64, freq: f64, phase: f64, offset: f64, span: f64) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| span * i as f64 / n as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&t| sinusoidal_model(t, amp, freq, phase, offset))
            .collect();
        (x, y)
    }

    #[test]
    fn test_recovers_clean_sinusoid() {
        let (x, y) = sine(100, 2.0, 5.0, 0.0, 0.0, 0.2);
        let fit = sinusoidal_fit(&x, &y).unwrap();
        assert!((fit.amplitude.abs() - 2.0).abs() < 1e-6);
        assert!((fit.frequency.abs() - 5.0).abs() < 1e-6);
        assert!(fit.residual_std < 1e-8);
    }

    #[test]
    fn test_recovers_offset_and_phase() {
        let (x, y) = sine(256, 1.5, 12.0, 0.7, 3.0, 1.0);
        let fit = sinusoidal_fit(&x, &y).unwrap();
        assert!((fit.offset - 3.0).abs() < 1e-6);
        // The model at the samples must match regardless of parameter
        // sign/phase ambiguities
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            assert!((fit.eval(xi) - yi).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sinus_frequency() {
        let (x, y) = sine(200, 1.0, 8.0, 0.0, 0.5, 1.0);
        let f = sinus_frequency(&x, &y).unwrap();
        assert!((f.abs() - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_tolerates_noise() {
        let (x, mut y) = sine(512, 1.0, 10.0, 0.3, 0.0, 1.0);
        // Deterministic small perturbation
        for (i, v) in y.iter_mut().enumerate() {
            *v += 0.01 * ((i as f64 * 12.9898).sin() * 43758.5453).fract();
        }
        let fit = sinusoidal_fit(&x, &y).unwrap();
        assert!((fit.frequency.abs() - 10.0).abs() < 0.05);
        assert!(fit.residual_std < 0.05);
    }
}
