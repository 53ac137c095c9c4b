//! Power spectral density via Welch's averaged-periodogram method

use std::f64::consts::PI;

use realfft::RealFftPlanner;

use crate::error::{check_min_length, check_same_length, Result};
use crate::numeric::sampling_rate;

/// Default segment length (matches the scipy `welch` default)
const DEFAULT_NPERSEG: usize = 256;

/// Compute the one-sided power spectral density of `y` using Welch's method
/// at the sampling rate derived from `x`.
///
/// Segments of `min(256, n)` samples with 50 % overlap are mean-removed,
/// Hann-windowed and averaged; interior bins carry the factor of two for
/// the one-sided density.
///
/// # Arguments
/// * `x` - X data (approximately uniform spacing)
/// * `y` - Y data, same length as `x`
/// * `log_scale` - Return `10 * log10(Pxx)` instead of `Pxx`
///
/// # Returns
/// Frequency axis and power spectral density
pub fn psd(x: &[f64], y: &[f64], log_scale: bool) -> Result<(Vec<f64>, Vec<f64>)> {
    check_same_length(x.len(), y.len())?;
    check_min_length(y.len(), 2)?;

    let fs = sampling_rate(x)?;
    let (freqs, mut pxx) = welch(y, fs, DEFAULT_NPERSEG.min(y.len()));
    if log_scale {
        for v in &mut pxx {
            *v = 10.0 * v.max(1e-20).log10();
        }
    }
    Ok((freqs, pxx))
}

/// Welch averaged periodogram: Hann window, 50 % overlap, per-segment mean
/// removal, one-sided density scaling.
pub fn welch(y: &[f64], fs: f64, nperseg: usize) -> (Vec<f64>, Vec<f64>) {
    let nperseg = nperseg.min(y.len()).max(1);
    let noverlap = nperseg / 2;
    let starts = segment_starts(y.len(), nperseg, noverlap);

    let window = periodic_hann(nperseg);
    let win_norm: f64 = window.iter().map(|&w| w * w).sum();

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(nperseg);

    let n_freq = nperseg / 2 + 1;
    let mut accum = vec![0.0; n_freq];
    let mut segment = vec![0.0; nperseg];
    let mut spectrum = r2c.make_output_vec();

    for &start in &starts {
        let avail = (y.len() - start).min(nperseg);
        let mean = y[start..start + avail].iter().sum::<f64>() / avail as f64;
        for i in 0..nperseg {
            let v = if i < avail { y[start + i] - mean } else { 0.0 };
            segment[i] = v * window[i];
        }
        // realfft rejects nothing here: length matches the plan
        let _ = r2c.process(&mut segment, &mut spectrum);

        for (k, c) in spectrum.iter().enumerate() {
            let mut p = c.norm_sqr() / (fs * win_norm);
            if k != 0 && !(nperseg % 2 == 0 && k == nperseg / 2) {
                p *= 2.0;
            }
            accum[k] += p;
        }
    }

    let inv = 1.0 / starts.len() as f64;
    for v in &mut accum {
        *v *= inv;
    }

    let freqs = (0..n_freq)
        .map(|k| k as f64 * fs / nperseg as f64)
        .collect();
    (freqs, accum)
}

/// Periodic (DFT-even) Hann window, the averaging default. Unlike the
/// symmetric windows in `windows/`, the denominator is `n`, not `n - 1`.
fn periodic_hann(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|k| 0.5 - 0.5 * (2.0 * PI * k as f64 / n as f64).cos())
        .collect()
}

fn segment_starts(len: usize, nperseg: usize, noverlap: usize) -> Vec<usize> {
    if len <= nperseg {
        return vec![0];
    }
    let hop = nperseg - noverlap;
    let mut starts = Vec::new();
    let mut start = 0;
    while start + nperseg <= len {
        starts.push(start);
        start += hop;
    }
    starts
}
