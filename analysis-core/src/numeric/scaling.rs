//! Signal normalization
//!
//! Single-signal and batched (rows = independent signals) entry points over
//! a closed set of normalization modes.

use std::str::FromStr;

use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex64;

use crate::error::{Result, SignalError};

/// Normalization modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Divide by the maximum value
    Maximum,
    /// Shift by the minimum, then divide by the maximum
    Amplitude,
    /// Divide by the sum of all values
    Area,
    /// Divide by `sqrt(sum(y * conj(y)))`
    Energy,
    /// Divide by `sqrt(mean(y * conj(y)))`
    Rms,
}

impl FromStr for NormalizeMode {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "maximum" => Ok(Self::Maximum),
            "amplitude" => Ok(Self::Amplitude),
            "area" => Ok(Self::Area),
            "energy" => Ok(Self::Energy),
            "rms" => Ok(Self::Rms),
            other => Err(SignalError::InvalidParameter(format!(
                "unsupported normalization mode '{other}'"
            ))),
        }
    }
}

/// Normalize a single signal.
///
/// # Arguments
/// * `y` - Input data
/// * `mode` - Normalization mode
///
/// # Returns
/// Normalized copy of `y`
pub fn normalize(y: &[f64], mode: NormalizeMode) -> Vec<f64> {
    match mode {
        NormalizeMode::Maximum => {
            let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            y.iter().map(|&v| v / max).collect()
        }
        NormalizeMode::Amplitude => {
            let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
            let shifted: Vec<f64> = y.iter().map(|&v| v - min).collect();
            normalize(&shifted, NormalizeMode::Maximum)
        }
        NormalizeMode::Area => {
            let sum: f64 = y.iter().sum();
            y.iter().map(|&v| v / sum).collect()
        }
        NormalizeMode::Energy => {
            let energy = y.iter().map(|&v| v * v).sum::<f64>().sqrt();
            y.iter().map(|&v| v / energy).collect()
        }
        NormalizeMode::Rms => {
            let rms = (y.iter().map(|&v| v * v).sum::<f64>() / y.len() as f64).sqrt();
            y.iter().map(|&v| v / rms).collect()
        }
    }
}

/// Normalize a batch of signals (one per row).
///
/// `Maximum` and `Amplitude` use per-row extrema; `Area`, `Energy` and `Rms`
/// use sums over the whole batch, matching the single-signal semantics
/// applied to the flattened array.
pub fn normalize_batch(y: ArrayView2<f64>, mode: NormalizeMode) -> Array2<f64> {
    match mode {
        NormalizeMode::Maximum => {
            let mut out = y.to_owned();
            for mut row in out.axis_iter_mut(Axis(0)) {
                let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                row.mapv_inplace(|v| v / max);
            }
            out
        }
        NormalizeMode::Amplitude => {
            let mut out = y.to_owned();
            for mut row in out.axis_iter_mut(Axis(0)) {
                let min = row.iter().cloned().fold(f64::INFINITY, f64::min);
                row.mapv_inplace(|v| v - min);
            }
            normalize_batch(out.view(), NormalizeMode::Maximum)
        }
        NormalizeMode::Area => {
            let sum = y.sum();
            y.mapv(|v| v / sum)
        }
        NormalizeMode::Energy => {
            let energy = y.iter().map(|&v| v * v).sum::<f64>().sqrt();
            y.mapv(|v| v / energy)
        }
        NormalizeMode::Rms => {
            let rms = (y.iter().map(|&v| v * v).sum::<f64>() / y.len() as f64).sqrt();
            y.mapv(|v| v / rms)
        }
    }
}

/// Normalize a complex signal by its energy or RMS.
///
/// Only the conjugate-aware modes are defined on complex input; peak-based
/// modes return an invalid-parameter error.
pub fn normalize_complex(y: &[Complex64], mode: NormalizeMode) -> Result<Vec<Complex64>> {
    let sum_sq: f64 = y.iter().map(|v| (v * v.conj()).re).sum();
    let scale = match mode {
        NormalizeMode::Energy => sum_sq.sqrt(),
        NormalizeMode::Rms => (sum_sq / y.len() as f64).sqrt(),
        other => {
            return Err(SignalError::InvalidParameter(format!(
                "normalization mode {other:?} is not defined for complex input"
            )))
        }
    };
    Ok(y.iter().map(|&v| v / scale).collect())
}
