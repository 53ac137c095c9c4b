//! Derivative, contrast, smoothing and sampling-step estimation
//!
//! All routines operate on co-indexed `x`/`y` slices and return freshly
//! allocated output; inputs are never mutated.

use log::warn;

use crate::error::{check_min_length, check_same_length, Result};

/// Maximum absolute second-order difference of the X steps before the
/// sampling is reported as non-constant.
const STEP_TOLERANCE: f64 = 1e-10;

/// Compute the numerical derivative dy/dx.
///
/// All but the last point use the forward ratio `diff(y)/diff(x)`; the last
/// point reuses the final two-point slope, so the output has the same length
/// as the input.
///
/// # Arguments
/// * `x` - X data (ascending)
/// * `y` - Y data, same length as `x`
///
/// # Returns
/// Derivative array of the same length as `y`
pub fn derivative(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    check_same_length(x.len(), y.len())?;
    check_min_length(y.len(), 2)?;

    let n = y.len();
    let mut dy = vec![0.0; n];
    for i in 0..n - 1 {
        dy[i] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
    }
    dy[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
    Ok(dy)
}

/// Compute the contrast `(max - min) / (max + min)` of `y`.
pub fn contrast(y: &[f64]) -> f64 {
    let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
    (max - min) / (max + min)
}

/// Compute a moving average with edge padding.
///
/// The signal is padded with `(n/2, n-1-n/2)` copies of its edge values so
/// the output keeps the input length.
///
/// # Arguments
/// * `y` - Input data
/// * `n` - Window size (>= 1)
pub fn moving_average(y: &[f64], n: usize) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(crate::error::SignalError::InvalidParameter(
            "moving average window size must be >= 1".into(),
        ));
    }
    check_min_length(y.len(), 1)?;

    let pad_left = n / 2;
    let pad_right = n - 1 - pad_left;
    let mut padded = Vec::with_capacity(y.len() + n - 1);
    padded.extend(std::iter::repeat(y[0]).take(pad_left));
    padded.extend_from_slice(y);
    padded.extend(std::iter::repeat(y[y.len() - 1]).take(pad_right));

    let inv = 1.0 / n as f64;
    let out = padded
        .windows(n)
        .map(|w| w.iter().sum::<f64>() * inv)
        .collect();
    Ok(out)
}

/// Compute the sampling period from the first step of `diff(x)`.
///
/// Most spectral routines assume approximately uniform spacing; when the
/// steps are not constant within tolerance this logs a warning and still
/// returns the first step.
pub fn sampling_period(x: &[f64]) -> Result<f64> {
    check_min_length(x.len(), 2)?;

    if x.len() > 2 {
        let worst = x
            .windows(3)
            .map(|w| ((w[2] - w[1]) - (w[1] - w[0])).abs())
            .fold(0.0, f64::max);
        if worst > STEP_TOLERANCE {
            warn!("Non-constant sampling signal (max step deviation {worst:e})");
        }
    }
    Ok(x[1] - x[0])
}

/// Compute the sampling rate (reciprocal of the sampling period).
pub fn sampling_rate(x: &[f64]) -> Result<f64> {
    Ok(1.0 / sampling_period(x)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivative_linear_ramp() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| 3.0 * v + 1.0).collect();

        let dy = derivative(&x, &y).unwrap();

        assert_eq!(dy.len(), y.len());
        for &d in &dy {
            assert!((d - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_derivative_last_point_reuses_slope() {
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 1.0, 4.0];

        let dy = derivative(&x, &y).unwrap();

        assert_eq!(dy[0], 1.0);
        assert_eq!(dy[1], 3.0);
        assert_eq!(dy[2], 3.0);
    }

    #[test]
    fn test_derivative_length_mismatch() {
        assert!(derivative(&[0.0, 1.0], &[0.0]).is_err());
        assert!(derivative(&[0.0], &[0.0]).is_err());
    }

    #[test]
    fn test_contrast() {
        let y = vec![1.0, 3.0];
        assert!((contrast(&y) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_moving_average_constant() {
        let y = vec![2.0; 20];
        let avg = moving_average(&y, 5).unwrap();

        assert_eq!(avg.len(), 20);
        for &v in &avg {
            assert!((v - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_moving_average_keeps_length() {
        let y: Vec<f64> = (0..17).map(|i| i as f64).collect();
        assert_eq!(moving_average(&y, 4).unwrap().len(), 17);
    }

    #[test]
    fn test_sampling_period_uniform() {
        let x: Vec<f64> = (0..100).map(|i| 0.25 * i as f64).collect();
        assert!((sampling_period(&x).unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sampling_period_returns_first_step() {
        // Non-uniform spacing: still returns x[1] - x[0] (with a warning)
        let x = vec![0.0, 1.0, 3.0, 6.0];
        assert_eq!(sampling_period(&x).unwrap(), 1.0);
    }

    #[test]
    fn test_sampling_rate() {
        let x: Vec<f64> = (0..8).map(|i| 0.5 * i as f64).collect();
        assert!((sampling_rate(&x).unwrap() - 2.0).abs() < 1e-12);
    }
}
