//! Peak width measurements (FWHM, full width at 1/e^2)

use std::str::FromStr;

use nalgebra::Vector4;

use crate::error::{check_min_length, check_same_length, Result, SignalError};
use crate::numeric::{find_x_at_value, Segment};
use crate::peaks::xpeak;

use super::lm::levenberg_marquardt;
use super::models::{Gaussian, Lorentzian, PeakShape, Voigt};

/// How to measure the full width at half maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FwhmMethod {
    /// Interpolated crossings of the half-maximum level, no model
    ZeroCrossing,
    /// Gaussian fit
    Gauss,
    /// Lorentzian fit
    Lorentz,
    /// Voigt fit
    Voigt,
}

impl FromStr for FwhmMethod {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "zero-crossing" => Ok(Self::ZeroCrossing),
            "gauss" => Ok(Self::Gauss),
            "lorentz" => Ok(Self::Lorentz),
            "voigt" => Ok(Self::Voigt),
            other => Err(SignalError::InvalidParameter(format!(
                "unsupported FWHM method '{other}'"
            ))),
        }
    }
}

/// Compute the FWHM of the peak in `y(x)`.
///
/// With [`FwhmMethod::ZeroCrossing`] the half-maximum level is intersected
/// with the data directly; the other methods fit the corresponding shape
/// and return its closed-form half-maximum span.
///
/// # Arguments
/// * `xmin`, `xmax` - Optional X-range restriction applied before measuring
///
/// # Returns
/// Horizontal segment spanning the peak at half maximum
pub fn fwhm(
    x: &[f64],
    y: &[f64],
    method: FwhmMethod,
    xmin: Option<f64>,
    xmax: Option<f64>,
) -> Result<Segment> {
    check_same_length(x.len(), y.len())?;
    check_min_length(x.len(), 4)?;

    // Seeds come from the full record; the range restriction below only
    // bounds the data being measured
    let dx = x[x.len() - 1] - x[0];
    let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let dy = max - min;
    let sigma = 0.1 * dx;
    let mu = xpeak(x, y)?;

    let (x, y) = clip_range(x, y, xmin, xmax);
    check_min_length(x.len(), 4)?;

    match method {
        FwhmMethod::ZeroCrossing => {
            let base = y.iter().cloned().fold(f64::INFINITY, f64::min);
            let hmax = 0.5 * dy + base;
            let fx = find_x_at_value(&x, &y, hmax);
            if fx.len() != 2 {
                log::warn!(
                    "expected two half-maximum crossings, found {}; using the outermost pair",
                    fx.len()
                );
            }
            Ok(Segment {
                x1: fx[0],
                y1: hmax,
                x2: fx[fx.len() - 1],
                y2: hmax,
            })
        }
        FwhmMethod::Gauss => fit_half_max(&x, &y, &Gaussian, dy, sigma, mu, min),
        FwhmMethod::Lorentz => fit_half_max(&x, &y, &Lorentzian, dy, sigma, mu, min),
        FwhmMethod::Voigt => fit_half_max(&x, &y, &Voigt, dy, sigma, mu, min),
    }
}

/// Compute the full width at `1/e^2` of the peak in `y(x)`, from a
/// Gaussian fit.
pub fn fw1e2(x: &[f64], y: &[f64]) -> Result<Segment> {
    check_same_length(x.len(), y.len())?;
    check_min_length(x.len(), 4)?;

    let dx = x[x.len() - 1] - x[0];
    let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let p = fit_shape(x, y, &Gaussian, max - min, 0.1 * dx, xpeak(x, y)?, min);
    let (amp, sigma, mu, base) = (p[0], p[1], p[2], p[3]);
    // exp(-(x-mu)^2 / (2 sigma^2)) = 1/e^2 at |x - mu| = 2 sigma
    let half = 2.0 * sigma.abs();
    let level = Gaussian.amplitude(amp, sigma) / std::f64::consts::E.powi(2) + base;
    Ok(Segment {
        x1: mu - half,
        y1: level,
        x2: mu + half,
        y2: level,
    })
}

#[allow(clippy::too_many_arguments)]
fn fit_half_max(
    x: &[f64],
    y: &[f64],
    shape: &dyn PeakShape,
    dy: f64,
    sigma: f64,
    mu: f64,
    base: f64,
) -> Result<Segment> {
    let p = fit_shape(x, y, shape, dy, sigma, mu, base);
    Ok(shape.half_max_segment(&p))
}

/// Fit a peak shape to the data from the given data-extent seeds.
#[allow(clippy::too_many_arguments)]
fn fit_shape(
    x: &[f64],
    y: &[f64],
    shape: &dyn PeakShape,
    dy: f64,
    sigma: f64,
    mu: f64,
    base: f64,
) -> Vector4<f64> {
    let p0 = Vector4::new(shape.amp_from_amplitude(dy, sigma), sigma, mu, base);

    let outcome = levenberg_marquardt(
        |p| {
            x.iter()
                .zip(y.iter())
                .map(|(&xi, &yi)| yi - shape.eval(xi, p))
                .collect()
        },
        p0,
    );
    let mut p = outcome.params;
    p[1] = p[1].abs();
    p
}

fn clip_range(x: &[f64], y: &[f64], xmin: Option<f64>, xmax: Option<f64>) -> (Vec<f64>, Vec<f64>) {
    let lo = xmin.unwrap_or(f64::NEG_INFINITY);
    let hi = xmax.unwrap_or(f64::INFINITY);
    x.iter()
        .zip(y.iter())
        .filter(|(&xi, _)| xi >= lo && xi <= hi)
        .map(|(&xi, &yi)| (xi, yi))
        .unzip()
}
