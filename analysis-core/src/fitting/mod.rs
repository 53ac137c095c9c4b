//! Least-squares model fitting and derived signal metrics

pub mod lm;
pub mod metrics;
pub mod models;
pub mod sine;
pub mod width;

pub use lm::{levenberg_marquardt, FitOutcome};
pub use metrics::{enob, sfdr, sinad, snr, thd, AmplitudeUnit};
pub use models::{Gaussian, Lorentzian, PeakShape, Voigt};
pub use sine::{sinus_frequency, sinusoidal_fit, sinusoidal_model, SinusoidFit};
pub use width::{fw1e2, fwhm, FwhmMethod};
