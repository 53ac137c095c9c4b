//! Analytic peak shapes used by the width estimators
//!
//! Each model is parameterized as `(amp, sigma, x0, y0)` where `amp` is an
//! area-like coefficient, not the peak height. [`PeakShape::amplitude`]
//! converts to the height above baseline and
//! [`PeakShape::amp_from_amplitude`] back, which is how initial guesses are
//! seeded from the data span.

use std::f64::consts::PI;

use nalgebra::Vector4;
use num_complex::Complex64;

use crate::numeric::Segment;

const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// A four-parameter peak model with a closed-form half-maximum span.
pub trait PeakShape {
    /// Evaluate the model at `x` with parameters `(amp, sigma, x0, y0)`.
    fn eval(&self, x: f64, p: &Vector4<f64>) -> f64;

    /// Peak height above the baseline for the given `amp` and `sigma`.
    fn amplitude(&self, amp: f64, sigma: f64) -> f64;

    /// Inverse of [`PeakShape::amplitude`]: the `amp` coefficient that
    /// yields the given height.
    fn amp_from_amplitude(&self, amplitude: f64, sigma: f64) -> f64;

    /// Full width at half maximum for the given `sigma`.
    fn fwhm(&self, sigma: f64) -> f64;

    /// Horizontal segment spanning the peak at half maximum.
    fn half_max_segment(&self, p: &Vector4<f64>) -> Segment {
        let (amp, sigma, x0, y0) = (p[0], p[1], p[2], p[3]);
        let half = self.fwhm(sigma) / 2.0;
        let level = self.amplitude(amp, sigma) / 2.0 + y0;
        Segment {
            x1: x0 - half,
            y1: level,
            x2: x0 + half,
            y2: level,
        }
    }
}

/// Gaussian peak, `y0 + amp * exp(-(x-x0)^2 / (2 sigma^2)) / (sigma sqrt(2 pi))`.
pub struct Gaussian;

impl PeakShape for Gaussian {
    fn eval(&self, x: f64, p: &Vector4<f64>) -> f64 {
        let (amp, sigma, x0, y0) = (p[0], p[1], p[2], p[3]);
        let u = (x - x0) / sigma;
        y0 + amp * (-0.5 * u * u).exp() / (sigma * (2.0 * PI).sqrt())
    }

    fn amplitude(&self, amp: f64, sigma: f64) -> f64 {
        amp / (sigma * (2.0 * PI).sqrt())
    }

    fn amp_from_amplitude(&self, amplitude: f64, sigma: f64) -> f64 {
        amplitude * sigma * (2.0 * PI).sqrt()
    }

    fn fwhm(&self, sigma: f64) -> f64 {
        2.0 * sigma * (2.0 * 2f64.ln()).sqrt()
    }
}

/// Lorentzian peak, `y0 + amp / (1 + ((x-x0)/sigma)^2) / (sigma pi)`.
pub struct Lorentzian;

impl PeakShape for Lorentzian {
    fn eval(&self, x: f64, p: &Vector4<f64>) -> f64 {
        let (amp, sigma, x0, y0) = (p[0], p[1], p[2], p[3]);
        let u = (x - x0) / sigma;
        y0 + amp / (1.0 + u * u) / (sigma * PI)
    }

    fn amplitude(&self, amp: f64, sigma: f64) -> f64 {
        amp / (sigma * PI)
    }

    fn amp_from_amplitude(&self, amplitude: f64, sigma: f64) -> f64 {
        amplitude * sigma * PI
    }

    fn fwhm(&self, sigma: f64) -> f64 {
        2.0 * sigma
    }
}

/// Voigt profile with equal Gaussian and Lorentzian widths,
/// `y0 + amp * Re(w(z)) / (sigma sqrt(2 pi))` with
/// `z = (x - x0 + i sigma) / (sigma sqrt(2))`.
pub struct Voigt;

impl Voigt {
    /// `Re(w(z))` at the peak center, `z = i / sqrt(2)`.
    fn center_value() -> f64 {
        faddeeva(Complex64::new(0.0, 1.0 / SQRT_2)).re
    }
}

impl PeakShape for Voigt {
    fn eval(&self, x: f64, p: &Vector4<f64>) -> f64 {
        let (amp, sigma, x0, y0) = (p[0], p[1], p[2], p[3]);
        let z = Complex64::new(x - x0, sigma) / (sigma * SQRT_2);
        y0 + amp * faddeeva(z).re / (sigma * (2.0 * PI).sqrt())
    }

    fn amplitude(&self, amp: f64, sigma: f64) -> f64 {
        amp * Self::center_value() / (sigma * (2.0 * PI).sqrt())
    }

    fn amp_from_amplitude(&self, amplitude: f64, sigma: f64) -> f64 {
        amplitude * sigma * (2.0 * PI).sqrt() / Self::center_value()
    }

    fn fwhm(&self, sigma: f64) -> f64 {
        // Olivero-Longbothum approximation with the Lorentzian width 2*sigma
        // and the Gaussian width 2*sigma*sqrt(2 ln 2)
        let fl = 2.0 * sigma;
        let fg = 2.0 * sigma * (2.0 * 2f64.ln()).sqrt();
        0.5346 * fl + (0.2166 * fl * fl + fg * fg).sqrt()
    }
}

/// Faddeeva function `w(z) = exp(-z^2) erfc(-iz)` for `Im(z) >= 0`,
/// Humlicek's four-region rational approximation.
pub(crate) fn faddeeva(z: Complex64) -> Complex64 {
    let (x, y) = (z.re, z.im);
    let t = Complex64::new(y, -x);
    let s = x.abs() + y;

    if s >= 15.0 {
        t * 0.5641896 / (0.5 + t * t)
    } else if s >= 5.5 {
        let u = t * t;
        t * (1.410474 + u * 0.5641896) / (0.75 + u * (3.0 + u))
    } else if y >= 0.195 * x.abs() - 0.176 {
        (16.4955 + t * (20.20933 + t * (11.96482 + t * (3.778987 + t * 0.5642236))))
            / (16.4955
                + t * (38.82363 + t * (39.27121 + t * (21.69274 + t * (6.699398 + t)))))
    } else {
        let u = t * t;
        let num = t
            * (36183.31
                - u * (3321.9905
                    - u * (1540.787
                        - u * (219.0313 - u * (35.76683 - u * (1.320522 - u * 0.56419))))));
        let den = 32066.6
            - u * (24322.84
                - u * (9022.228
                    - u * (2186.181 - u * (364.2191 - u * (61.57037 - u * (1.841439 - u))))));
        u.exp() - num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gaussian_amplitude_round_trip() {
        let amp = Gaussian.amp_from_amplitude(3.0, 0.7);
        assert_abs_diff_eq!(Gaussian.amplitude(amp, 0.7), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_peak_height() {
        let p = Vector4::new(Gaussian.amp_from_amplitude(2.0, 0.5), 0.5, 1.0, 0.25);
        assert_abs_diff_eq!(Gaussian.eval(1.0, &p), 2.25, epsilon = 1e-12);
    }

    #[test]
    fn test_lorentzian_half_max_width() {
        // FWHM = 2 sigma: the model must sit at half height there
        let p = Vector4::new(Lorentzian.amp_from_amplitude(4.0, 0.8), 0.8, 0.0, 0.0);
        let seg = Lorentzian.half_max_segment(&p);
        assert!((seg.x2 - seg.x1 - 1.6).abs() < 1e-12);
        assert!((Lorentzian.eval(seg.x2, &p) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_faddeeva_at_origin() {
        // w(0) = 1
        let w = faddeeva(Complex64::new(0.0, 0.0));
        assert!((w.re - 1.0).abs() < 1e-4);
        assert!(w.im.abs() < 1e-4);
    }

    #[test]
    fn test_faddeeva_on_imaginary_axis() {
        // w(iy) = exp(y^2) erfc(y); at y = 1 this is about 0.42758
        let w = faddeeva(Complex64::new(0.0, 1.0));
        assert!((w.re - 0.4275836).abs() < 1e-4);
        assert!(w.im.abs() < 1e-6);
    }

    #[test]
    fn test_voigt_wider_than_gaussian() {
        // Equal sigmas: the Voigt profile is always broader
        assert!(Voigt.fwhm(0.5) > Gaussian.fwhm(0.5));
        assert!(Voigt.fwhm(0.5) > Lorentzian.fwhm(0.5));
    }

    #[test]
    fn test_voigt_amplitude_round_trip() {
        let amp = Voigt.amp_from_amplitude(5.0, 1.2);
        assert!((Voigt.amplitude(amp, 1.2) - 5.0).abs() < 1e-9);
        let p = Vector4::new(amp, 1.2, 0.0, 0.0);
        assert!((Voigt.eval(0.0, &p) - 5.0).abs() < 1e-3);
    }
}
