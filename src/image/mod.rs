//! Raster views and owned raster buffers.
//!
//! `ImageView` is a borrowed, read-only 2D view into a 1D buffer with an
//! explicit stride (elements between row starts). The correlator only ever
//! reads through views, so callers keep ownership of their pixel data.

use crate::util::{TexCorrError, TexCorrResult};

#[cfg(feature = "image-io")]
pub mod io;
mod owned;

pub use owned::OwnedImage;

/// Scalar sample type that can be promoted to `f64` for correlation.
pub trait Sample: Copy + Send + Sync {
    /// Returns the sample as a double precision value.
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($ty:ty),+) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }
            }
        )+
    };
}

impl_sample!(u8, u16, f32, f64);

/// Borrowed 2D raster view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> TexCorrResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> TexCorrResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(TexCorrError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of samples covered by the view (`width * height`).
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false: views are validated to be non-empty on construction.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the sample at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns row `y` without its stride padding.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        // Row bounds were validated in `new`.
        (0..self.height).filter_map(move |y| self.row(y))
    }

    /// Returns a zero-copy region of interest sharing the backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> TexCorrResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(TexCorrError::InvalidDimensions { width, height });
        }

        let out_of_bounds = TexCorrError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x;
        ImageView::new(&self.data[start..], width, height, self.stride)
    }
}

impl<T: Sample> ImageView<'_, T> {
    /// Copies the view into a contiguous `f64` buffer in row-major order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        for row in self.rows() {
            out.extend(row.iter().map(|&v| v.to_f64()));
        }
        out
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> TexCorrResult<usize> {
    if width == 0 || height == 0 {
        return Err(TexCorrError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(TexCorrError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(TexCorrError::InvalidDimensions { width, height })
}
