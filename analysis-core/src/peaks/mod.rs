//! Local-maxima peak detection
//!
//! First-order-difference peak finder with plateau resolution and
//! minimum-distance pruning, after the PeakUtils algorithm.

use crate::error::{check_same_length, Result, SignalError};

/// Find the indices of the peaks in `y` by taking its first-order
/// difference.
///
/// Plateaus (runs of exactly-zero differences) are resolved by propagating
/// the neighboring slopes: an edge run takes the slope on its open side,
/// an interior run is split at its median index. Candidates are indices
/// where the difference changes sign from positive to negative and the
/// sample exceeds the threshold. When `min_dist > 1`, candidates are pruned
/// highest-amplitude-first so the tallest peak of any cluster survives.
///
/// # Arguments
/// * `y` - Amplitude data (signed by construction of `f64`)
/// * `thres` - Detection threshold; relative to the data span unless
///   `thres_abs`
/// * `min_dist` - Minimum index distance between surviving peaks
/// * `thres_abs` - Interpret `thres` as an absolute amplitude
///
/// # Returns
/// Strictly increasing peak indices; empty when the signal is flat
pub fn peak_indexes(y: &[f64], thres: f64, min_dist: usize, thres_abs: bool) -> Vec<usize> {
    if y.len() < 3 {
        return Vec::new();
    }

    let thres = if thres_abs {
        thres
    } else {
        let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
        thres * (max - min) + min
    };

    let mut dy: Vec<f64> = y.windows(2).map(|w| w[1] - w[0]).collect();

    let zeros: Vec<usize> = (0..dy.len()).filter(|&i| dy[i] == 0.0).collect();
    if zeros.len() == dy.len() {
        // Totally flat signal
        return Vec::new();
    }

    if !zeros.is_empty() {
        resolve_plateaus(&mut dy, &zeros);
    }

    let mut peaks: Vec<usize> = (1..dy.len())
        .filter(|&i| dy[i] < 0.0 && dy[i - 1] > 0.0 && y[i] > thres)
        .collect();

    if peaks.len() > 1 && min_dist > 1 {
        peaks = prune_by_distance(y, &peaks, min_dist);
    }
    peaks
}

/// Reassign zero runs of the difference array to their neighboring slopes.
fn resolve_plateaus(dy: &mut [f64], zeros: &[usize]) {
    // Group chained zero indices into plateaus
    let mut plateaus: Vec<(usize, usize)> = Vec::new();
    let mut start = zeros[0];
    let mut prev = zeros[0];
    for &z in &zeros[1..] {
        if z != prev + 1 {
            plateaus.push((start, prev));
            start = z;
        }
        prev = z;
    }
    plateaus.push((start, prev));

    for &(first, last) in &plateaus {
        if first == 0 {
            // Left edge: take the slope immediately following the run
            if last + 1 < dy.len() {
                let slope = dy[last + 1];
                for v in &mut dy[first..=last] {
                    *v = slope;
                }
            }
        } else if last == dy.len() - 1 {
            // Right edge: take the slope immediately preceding the run
            let slope = dy[first - 1];
            for v in &mut dy[first..=last] {
                *v = slope;
            }
        } else {
            // Interior: split at the median index; the left half takes the
            // preceding slope, the median and right half take the following
            let median = (first + last) / 2 + (last - first) % 2;
            let before = dy[first - 1];
            let after = dy[last + 1];
            for i in first..median {
                dy[i] = before;
            }
            for i in median..=last {
                dy[i] = after;
            }
        }
    }
}

/// Keep the tallest candidate of every `min_dist` cluster.
fn prune_by_distance(y: &[f64], peaks: &[usize], min_dist: usize) -> Vec<usize> {
    let mut highest: Vec<usize> = peaks.to_vec();
    highest.sort_by(|&a, &b| y[b].partial_cmp(&y[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut removed = vec![true; y.len()];
    for &p in peaks {
        removed[p] = false;
    }

    for &peak in &highest {
        if !removed[peak] {
            let lo = peak.saturating_sub(min_dist);
            let hi = (peak + min_dist + 1).min(y.len());
            for v in &mut removed[lo..hi] {
                *v = true;
            }
            removed[peak] = false;
        }
    }

    (0..y.len()).filter(|&i| !removed[i]).collect()
}

/// Return the default peak X-position, assuming a single peak.
///
/// Falls back to the amplitude-weighted average of X when zero or several
/// peaks are detected; a zero total weight makes that average undefined and
/// is rejected.
pub fn xpeak(x: &[f64], y: &[f64]) -> Result<f64> {
    check_same_length(x.len(), y.len())?;

    let peaks = peak_indexes(y, 0.3, 1, false);
    if peaks.len() == 1 {
        return Ok(x[peaks[0]]);
    }
    let weight: f64 = y.iter().sum();
    if weight == 0.0 {
        return Err(SignalError::InvalidParameter(
            "amplitude-weighted peak position is undefined for zero-sum data".into(),
        ));
    }
    Ok(x.iter().zip(y.iter()).map(|(&xi, &yi)| xi * yi).sum::<f64>() / weight)
}
