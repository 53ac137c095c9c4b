//! Numeric utilities on sampled X/Y signals

pub mod calculus;
pub mod crossing;
pub mod scaling;

pub use calculus::{contrast, derivative, moving_average, sampling_period, sampling_rate};
pub use crossing::{bandwidth, find_nearest_zero_point_idx, find_x_at_value, Segment};
pub use scaling::{normalize, normalize_batch, normalize_complex, NormalizeMode};
