//! Spectral transforms and power spectral density

pub mod fft;
pub mod psd;

pub use fft::{
    fft1d, fftfreq, fftshift, ifft1d, ifftshift, magnitude_spectrum, phase_spectrum,
    sort_frequencies,
};
pub use psd::{psd, welch};
