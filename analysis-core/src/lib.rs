//! Signal Analysis Core - Numerical routines for sampled 1-D signals
//!
//! Spectral transforms, peak detection, interpolation, windowing and
//! model-fit quality metrics over paired X/Y data.

pub mod error;
pub mod fitting;
pub mod interp;
pub mod numeric;
pub mod peaks;
pub mod spectrum;
pub mod windows;

pub use error::{Result, SignalError};
pub use fitting::{sinusoidal_fit, FwhmMethod, SinusoidFit};
pub use interp::InterpMethod;
pub use numeric::{NormalizeMode, Segment};
pub use peaks::peak_indexes;
pub use windows::WindowKind;
