//! Greedy non-maximum suppression for surface peaks.

use crate::peak::{sort_peaks_desc, Peak};

/// Applies 2D non-maximum suppression using Chebyshev distance.
///
/// Peaks are sorted by descending value and kept if they are farther than
/// `radius` from every previously kept peak. Stops once `limit` peaks are kept.
pub fn nms_2d(peaks: &mut [Peak], radius: usize, limit: usize) -> Vec<Peak> {
    sort_peaks_desc(peaks);
    if radius == 0 {
        return peaks.iter().copied().take(limit).collect();
    }

    let mut kept: Vec<Peak> = Vec::with_capacity(limit.min(peaks.len()));
    'outer: for peak in peaks.iter().copied() {
        if kept.len() >= limit {
            break;
        }
        for kept_peak in &kept {
            let dx = peak.x.abs_diff(kept_peak.x);
            let dy = peak.y.abs_diff(kept_peak.y);
            if dx.max(dy) <= radius {
                continue 'outer;
            }
        }
        kept.push(peak);
    }

    kept
}
