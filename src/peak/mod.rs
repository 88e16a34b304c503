//! Peak search over correlation surfaces.
//!
//! [`find_peak`] is the exhaustive maximum scan used to read off the best
//! alignment. It walks the surface column-major (outer loop over `x`, inner
//! loop over `y`) and only lets a later cell replace the incumbent when it is
//! larger by more than [`PEAK_EPSILON`]. Near-ties therefore resolve to the
//! lowest `x`, then the lowest `y`.

use crate::image::ImageView;
use crate::trace::trace_event;
use crate::util::{TexCorrError, TexCorrResult};
use std::cmp::Ordering;

mod nms;

pub use nms::nms_2d;

/// Minimum improvement required to replace the current best cell.
pub const PEAK_EPSILON: f32 = 1e-6;

/// Location and value of a surface maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Column of the peak.
    pub x: usize,
    /// Row of the peak.
    pub y: usize,
    /// Correlation value at the peak.
    pub value: f32,
}

/// Orders peaks by descending value, then ascending `x`, then ascending `y`.
pub(crate) fn peak_cmp_desc(a: &Peak, b: &Peak) -> Ordering {
    b.value
        .total_cmp(&a.value)
        .then_with(|| a.x.cmp(&b.x))
        .then_with(|| a.y.cmp(&b.y))
}

/// Sorts peaks by descending value with deterministic tie-breaking.
pub(crate) fn sort_peaks_desc(peaks: &mut [Peak]) {
    peaks.sort_by(peak_cmp_desc);
}

/// Returns the maximum of `surface` and its coordinate.
///
/// Non-finite cells are ignored. Fails with [`TexCorrError::EmptySurface`]
/// when no finite value exists.
pub fn find_peak(surface: ImageView<'_, f32>) -> TexCorrResult<Peak> {
    let mut best: Option<Peak> = None;
    for x in 0..surface.width() {
        for y in 0..surface.height() {
            let Some(&value) = surface.get(x, y) else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }
            match best {
                Some(current) if value - current.value <= PEAK_EPSILON => {}
                _ => best = Some(Peak { x, y, value }),
            }
        }
    }

    let peak = best.ok_or(TexCorrError::EmptySurface)?;
    trace_event!("peak", x = peak.x, y = peak.y, value = peak.value);
    Ok(peak)
}

/// Returns up to `k` peaks in descending value order.
///
/// A cell is suppressed when a stronger kept peak lies within Chebyshev
/// distance `nms_radius`; a radius of zero keeps every cell as a candidate.
pub fn find_peaks(surface: ImageView<'_, f32>, k: usize, nms_radius: usize) -> Vec<Peak> {
    if k == 0 {
        return Vec::new();
    }
    let mut candidates = Vec::with_capacity(surface.len());
    for (y, row) in surface.rows().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value.is_finite() {
                candidates.push(Peak { x, y, value });
            }
        }
    }
    nms_2d(&mut candidates, nms_radius, k)
}
