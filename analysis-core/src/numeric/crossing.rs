//! Zero-crossing root finding and level-crossing measurements

use crate::error::{check_min_length, check_same_length, Result};

/// A straight segment between two points, used to report level-crossing
/// spans (bandwidth, FWHM).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Find the indices `i` where `y[i]` and `y[i+1]` straddle (or touch) zero.
pub fn find_nearest_zero_point_idx(y: &[f64]) -> Vec<usize> {
    let mut idx = Vec::new();
    for i in 0..y.len().saturating_sub(1) {
        let (a, b) = (y[i], y[i + 1]);
        if (a >= 0.0 && b <= 0.0) || (a <= 0.0 && b >= 0.0) {
            idx.push(i);
        }
    }
    idx
}

/// Find the X positions where `y` crosses `value`, one per sign-change
/// bracket, using linear interpolation within the bracket.
///
/// Returns `[0.0]` when no bracket is found — a documented fallback, not an
/// error.
pub fn find_x_at_value(x: &[f64], y: &[f64], value: f64) -> Vec<f64> {
    let leveled: Vec<f64> = y.iter().map(|&v| v - value).collect();
    let brackets = find_nearest_zero_point_idx(&leveled);
    if brackets.is_empty() {
        return vec![0.0];
    }

    brackets
        .iter()
        .map(|&i| {
            // Line through the bracket endpoints; solve for the x-intercept.
            let p = (leveled[i + 1] - leveled[i]) / (x[i + 1] - x[i]);
            let ori = leveled[i + 1] - p * x[i + 1];
            -ori / p
        })
        .collect()
}

/// Compute the bandwidth of a signal at `level_db` below its maximum.
///
/// The returned segment runs from the first sample to the first crossing of
/// `max(y) - level_db`.
pub fn bandwidth(x: &[f64], y: &[f64], level_db: f64) -> Result<Segment> {
    check_same_length(x.len(), y.len())?;
    check_min_length(y.len(), 2)?;

    let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let level = max - level_db;
    let bw = find_x_at_value(x, y, level)[0];
    Ok(Segment {
        x1: x[0],
        y1: level,
        x2: bw,
        y2: level,
    })
}
