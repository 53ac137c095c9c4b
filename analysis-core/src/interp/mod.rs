//! Interpolation of sampled signals onto a new X axis

pub mod spline;

use std::str::FromStr;

use nalgebra::{Matrix3, Vector3};

use crate::error::{check_min_length, check_same_length, Result, SignalError};

/// Interpolation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpMethod {
    /// Piecewise linear
    Linear,
    /// Interpolating natural cubic spline
    Spline,
    /// Global least-squares parabola
    Quadratic,
    /// Akima piecewise cubic
    Cubic,
    /// Barycentric Lagrange polynomial
    Barycentric,
    /// Monotone piecewise cubic (Fritsch-Carlson)
    Pchip,
}

impl FromStr for InterpMethod {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "spline" => Ok(Self::Spline),
            "quadratic" => Ok(Self::Quadratic),
            "cubic" => Ok(Self::Cubic),
            "barycentric" => Ok(Self::Barycentric),
            "pchip" => Ok(Self::Pchip),
            other => Err(SignalError::InvalidParameter(format!(
                "unsupported interpolation method '{other}'"
            ))),
        }
    }
}

/// Interpolate `y` sampled at `x` onto `x_new`.
///
/// `fill_value` replaces out-of-range results for the `Linear`, `Cubic` and
/// `Pchip` methods; `Spline`, `Quadratic` and `Barycentric` always
/// extrapolate and ignore it (an intentional asymmetry kept from the
/// method set's origins).
///
/// # Arguments
/// * `x` - X data, strictly ascending
/// * `y` - Y data, same length as `x`
/// * `x_new` - Points to evaluate at
/// * `method` - Interpolation method
/// * `fill_value` - Constant used outside `[x[0], x[n-1]]` where honored
pub fn interpolate(
    x: &[f64],
    y: &[f64],
    x_new: &[f64],
    method: InterpMethod,
    fill_value: Option<f64>,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), y.len())?;
    check_min_length(x.len(), 2)?;

    let y_new = match method {
        InterpMethod::Linear => linear(x, y, x_new, fill_value),
        InterpMethod::Spline => spline::natural_cubic(x, y, x_new),
        InterpMethod::Quadratic => quadratic_polyfit(x, y, x_new)?,
        InterpMethod::Cubic => clamp_fill(x, x_new, spline::akima(x, y, x_new)?, fill_value),
        InterpMethod::Barycentric => barycentric(x, y, x_new),
        InterpMethod::Pchip => clamp_fill(x, x_new, spline::pchip(x, y, x_new)?, fill_value),
    };
    Ok(y_new)
}

/// Piecewise linear interpolation with end clamping or constant fill.
fn linear(x: &[f64], y: &[f64], x_new: &[f64], fill_value: Option<f64>) -> Vec<f64> {
    x_new
        .iter()
        .map(|&xi| {
            if xi < x[0] {
                return fill_value.unwrap_or(y[0]);
            }
            if xi > x[x.len() - 1] {
                return fill_value.unwrap_or(y[y.len() - 1]);
            }
            let j = upper_interval(x, xi);
            let t = (xi - x[j]) / (x[j + 1] - x[j]);
            y[j] + t * (y[j + 1] - y[j])
        })
        .collect()
}

/// Global degree-2 least-squares polynomial evaluated at `x_new`.
fn quadratic_polyfit(x: &[f64], y: &[f64], x_new: &[f64]) -> Result<Vec<f64>> {
    // Normal equations for the Vandermonde system
    let n = x.len() as f64;
    let (mut s1, mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0, 0.0);
    let (mut t0, mut t1, mut t2) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let x2 = xi * xi;
        s1 += xi;
        s2 += x2;
        s3 += x2 * xi;
        s4 += x2 * x2;
        t0 += yi;
        t1 += xi * yi;
        t2 += x2 * yi;
    }
    let a = Matrix3::new(s4, s3, s2, s3, s2, s1, s2, s1, n);
    let b = Vector3::new(t2, t1, t0);
    let coeffs = a.lu().solve(&b).ok_or_else(|| {
        SignalError::InvalidParameter("quadratic fit is singular for the given X data".into())
    })?;

    Ok(x_new
        .iter()
        .map(|&xi| (coeffs[0] * xi + coeffs[1]) * xi + coeffs[2])
        .collect())
}

/// Barycentric Lagrange interpolation through all samples.
fn barycentric(x: &[f64], y: &[f64], x_new: &[f64]) -> Vec<f64> {
    let n = x.len();
    // Barycentric weights w_j = 1 / prod_{k != j} (x_j - x_k), scaled for
    // numerical range by the mean spacing
    let scale = (x[n - 1] - x[0]) / n as f64;
    let mut w = vec![1.0; n];
    for j in 0..n {
        for k in 0..n {
            if k != j {
                w[j] /= (x[j] - x[k]) / scale;
            }
        }
    }

    x_new
        .iter()
        .map(|&xi| {
            let mut num = 0.0;
            let mut den = 0.0;
            for j in 0..n {
                let d = xi - x[j];
                if d == 0.0 {
                    return y[j];
                }
                let c = w[j] / d;
                num += c * y[j];
                den += c;
            }
            num / den
        })
        .collect()
}

/// Overwrite out-of-range results with `fill_value` when given.
fn clamp_fill(x: &[f64], x_new: &[f64], mut y_new: Vec<f64>, fill_value: Option<f64>) -> Vec<f64> {
    if let Some(fill) = fill_value {
        let (lo, hi) = (x[0], x[x.len() - 1]);
        for (xi, yi) in x_new.iter().zip(y_new.iter_mut()) {
            if *xi < lo || *xi > hi {
                *yi = fill;
            }
        }
    }
    y_new
}

/// Index `j` of the interval `[x[j], x[j+1]]` containing `xi`, for `xi`
/// within range.
pub(crate) fn upper_interval(x: &[f64], xi: f64) -> usize {
    match x.binary_search_by(|v| v.partial_cmp(&xi).unwrap_or(std::cmp::Ordering::Less)) {
        Ok(j) => j.min(x.len() - 2),
        Err(j) => j.saturating_sub(1).min(x.len() - 2),
    }
}
