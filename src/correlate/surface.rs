//! Correlation surface produced by the correlator.

use crate::image::{ImageView, OwnedImage};
use crate::peak::{find_peak, find_peaks, Peak};
use crate::util::TexCorrResult;

/// Normalized correlation values for every valid relative offset.
///
/// Along each axis, index `k` is the placement of the smaller operand inside
/// the larger one. When both operands have the same extent along an axis the
/// surface is one sample wide along it.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationSurface {
    values: OwnedImage<f32>,
    a_spans_x: bool,
    a_spans_y: bool,
}

impl CorrelationSurface {
    pub(crate) fn new(values: OwnedImage<f32>, a_spans_x: bool, a_spans_y: bool) -> Self {
        Self {
            values,
            a_spans_x,
            a_spans_y,
        }
    }

    pub fn width(&self) -> usize {
        self.values.width()
    }

    pub fn height(&self) -> usize {
        self.values.height()
    }

    /// Returns the value at offset `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.values.view().get(x, y).copied()
    }

    /// Row-major surface values.
    pub fn values(&self) -> &[f32] {
        self.values.data()
    }

    /// Borrows the surface as a generic 2D field.
    pub fn view(&self) -> ImageView<'_, f32> {
        self.values.view()
    }

    /// Consumes the surface, returning its raster.
    pub fn into_image(self) -> OwnedImage<f32> {
        self.values
    }

    /// Displacement of operand B's origin relative to operand A's origin.
    ///
    /// Positive along an axis where A is at least as large as B (B sits
    /// inside A), negative where B is larger (A sits inside B).
    pub fn relative_shift(&self, x: usize, y: usize) -> (isize, isize) {
        let signed = |k: usize, a_spans: bool| {
            let k = k as isize;
            if a_spans {
                k
            } else {
                -k
            }
        };
        (signed(x, self.a_spans_x), signed(y, self.a_spans_y))
    }

    /// Exhaustive maximum search, see [`find_peak`].
    pub fn peak(&self) -> TexCorrResult<Peak> {
        find_peak(self.view())
    }

    /// Up to `k` suppressed peaks, see [`find_peaks`].
    pub fn peaks(&self, k: usize, nms_radius: usize) -> Vec<Peak> {
        find_peaks(self.view(), k, nms_radius)
    }
}
