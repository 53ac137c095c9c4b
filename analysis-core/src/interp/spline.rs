//! Piecewise-cubic interpolators: natural spline, Akima, PCHIP

use crate::error::{check_min_length, Result};

use super::upper_interval;

/// Interpolating natural cubic spline evaluated at `x_new`.
///
/// End segments are extended for out-of-range points (always extrapolates).
pub fn natural_cubic(x: &[f64], y: &[f64], x_new: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 2 {
        return hermite_eval(x, y, &[slope(x, y, 0), slope(x, y, 0)], x_new);
    }

    // Second derivatives from the tridiagonal system, natural boundary
    // conditions (M[0] = M[n-1] = 0)
    let mut m = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    // Forward sweep over interior rows
    let mut c_prev = 0.0;
    let mut d_prev = 0.0;
    for i in 1..n - 1 {
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        let b = 2.0 * (h0 + h1);
        let r = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);

        let denom = b - h0 * c_prev;
        diag[i] = h1 / denom;
        rhs[i] = (r - h0 * d_prev) / denom;
        c_prev = diag[i];
        d_prev = rhs[i];
    }
    for i in (1..n - 1).rev() {
        m[i] = rhs[i] - diag[i] * m[i + 1];
    }

    x_new
        .iter()
        .map(|&xi| {
            let j = upper_interval(x, xi.clamp(x[0], x[n - 1]));
            let h = x[j + 1] - x[j];
            let a = (x[j + 1] - xi) / h;
            let b = (xi - x[j]) / h;
            a * y[j]
                + b * y[j + 1]
                + ((a * a * a - a) * m[j] + (b * b * b - b) * m[j + 1]) * h * h / 6.0
        })
        .collect()
}

/// Akima piecewise-cubic interpolation.
///
/// Derivatives weight the neighboring slopes by the flatness of the slopes
/// beyond them, which suppresses overshoot near outliers. End polynomials
/// extrapolate out of range.
pub fn akima(x: &[f64], y: &[f64], x_new: &[f64]) -> Result<Vec<f64>> {
    check_min_length(x.len(), 2)?;
    let n = x.len();
    if n == 2 {
        let s = slope(x, y, 0);
        return Ok(hermite_eval(x, y, &[s, s], x_new));
    }

    // Interval slopes extended by two synthetic slopes on each side
    let mut m = Vec::with_capacity(n + 3);
    m.extend(std::iter::repeat(0.0).take(2));
    for i in 0..n - 1 {
        m.push(slope(x, y, i));
    }
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 2.0 * m[1] - m[2];
    let mn = 2.0 * m[n] - m[n - 1];
    m.push(mn);
    m.push(2.0 * mn - m[n]);

    // Derivative at sample i from extended slopes m[i..i+4]
    let mut d = vec![0.0; n];
    for i in 0..n {
        let w1 = (m[i + 3] - m[i + 2]).abs();
        let w2 = (m[i + 1] - m[i]).abs();
        d[i] = if w1 + w2 == 0.0 {
            0.5 * (m[i + 1] + m[i + 2])
        } else {
            (w1 * m[i + 1] + w2 * m[i + 2]) / (w1 + w2)
        };
    }

    Ok(hermite_eval(x, y, &d, x_new))
}

/// Monotone piecewise-cubic interpolation (Fritsch-Carlson derivatives).
pub fn pchip(x: &[f64], y: &[f64], x_new: &[f64]) -> Result<Vec<f64>> {
    check_min_length(x.len(), 2)?;
    let n = x.len();
    if n == 2 {
        let s = slope(x, y, 0);
        return Ok(hermite_eval(x, y, &[s, s], x_new));
    }

    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let m: Vec<f64> = (0..n - 1).map(|i| slope(x, y, i)).collect();

    let mut d = vec![0.0; n];
    for i in 1..n - 1 {
        if m[i - 1] * m[i] <= 0.0 {
            d[i] = 0.0;
        } else {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            d[i] = (w1 + w2) / (w1 / m[i - 1] + w2 / m[i]);
        }
    }
    d[0] = edge_derivative(h[0], h[1], m[0], m[1]);
    d[n - 1] = edge_derivative(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);

    Ok(hermite_eval(x, y, &d, x_new))
}

/// One-sided three-point end derivative with the monotonicity clamps.
fn edge_derivative(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if d * m0 <= 0.0 {
        0.0
    } else if m0 * m1 <= 0.0 && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

fn slope(x: &[f64], y: &[f64], i: usize) -> f64 {
    (y[i + 1] - y[i]) / (x[i + 1] - x[i])
}

/// Evaluate the cubic Hermite interpolant with sample derivatives `d`,
/// extending the end segments outside the data range.
fn hermite_eval(x: &[f64], y: &[f64], d: &[f64], x_new: &[f64]) -> Vec<f64> {
    let n = x.len();
    x_new
        .iter()
        .map(|&xi| {
            let j = upper_interval(x, xi.clamp(x[0], x[n - 1]));
            let h = x[j + 1] - x[j];
            let t = (xi - x[j]) / h;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            h00 * y[j] + h10 * h * d[j] + h01 * y[j + 1] + h11 * h * d[j + 1]
        })
        .collect()
}
