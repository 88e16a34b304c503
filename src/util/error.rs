//! Error types for texcorr.

use thiserror::Error;

/// Result alias for texcorr operations.
pub type TexCorrResult<T> = std::result::Result<T, TexCorrError>;

/// Identifies which correlation operand an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// The first raster passed to the correlator.
    A,
    /// The second raster passed to the correlator.
    B,
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::A => f.write_str("A"),
            Operand::B => f.write_str("B"),
        }
    }
}

/// Errors that can occur when correlating rasters or searching surfaces.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TexCorrError {
    /// A raster or surface has zero width or height, or its size overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The row stride is shorter than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer does not cover the declared dimensions.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest does not fit inside its parent raster.
    #[error("roi {width}x{height} at ({x}, {y}) exceeds image {img_width}x{img_height}")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A raster is constant (its centered energy is negligible next to its raw
    /// energy), so the normalization denominator vanishes.
    #[error("degenerate input {which}: variance {variance} is too small to normalize")]
    DegenerateInput { which: Operand, variance: f64 },
    /// Scratch memory for the padded or spectral buffers could not be reserved.
    #[error("failed to allocate {bytes} bytes of scratch memory")]
    AllocationFailed { bytes: usize },
    /// Peak search found no finite value to report.
    #[error("surface has no finite values")]
    EmptySurface,
    /// Image decoding failed.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
