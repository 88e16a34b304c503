//! Owned contiguous raster storage.

use crate::image::ImageView;
use crate::util::{TexCorrError, TexCorrResult};

/// Owned contiguous raster (`stride == width`).
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> OwnedImage<T> {
    /// Wraps a row-major buffer whose length must equal `width * height`.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> TexCorrResult<Self> {
        if width == 0 || height == 0 {
            return Err(TexCorrError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(TexCorrError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(TexCorrError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(TexCorrError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the contiguous sample buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a borrowed view of the whole raster.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

impl<T: Copy> OwnedImage<T> {
    /// Copies a (possibly strided) view into a contiguous owned raster.
    pub fn from_view(view: ImageView<'_, T>) -> TexCorrResult<Self> {
        let mut data = Vec::with_capacity(view.len());
        for row in view.rows() {
            data.extend_from_slice(row);
        }
        Self::new(data, view.width(), view.height())
    }

    /// Builds a raster by evaluating `f(x, y)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> TexCorrResult<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        let len = width
            .checked_mul(height)
            .ok_or(TexCorrError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }
}
