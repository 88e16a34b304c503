//! texcorr computes FFT-based normalized cross-correlation (NCC) surfaces
//! between two single-channel rasters and locates the best-aligned offset.
//!
//! The typical use is measuring how well a small texture patch matches a
//! location in a larger image:
//!
//! ```
//! use texcorr::{correlate, ImageView};
//!
//! let patch = [10u8, 200, 30, 90];
//! let view = ImageView::from_slice(&patch, 2, 2)?;
//! let peak = correlate(view, view)?.peak()?;
//! assert_eq!((peak.x, peak.y), (0, 0));
//! assert!((peak.value - 1.0).abs() < 1e-4);
//! # Ok::<(), texcorr::TexCorrError>(())
//! ```
//!
//! Transform plans and scratch buffers live in a caller-owned
//! [`FftContext`]; [`Correlator`] bundles one with its settings for repeated
//! calls. The optional `rayon` feature parallelizes the transform passes,
//! `image-io` adds file loading, and `tracing` emits spans and events.

pub mod correlate;
pub mod fft;
pub mod image;
pub mod peak;
mod trace;
pub mod util;

pub use crate::correlate::{
    correlate, correlate_with, CorrelationConfig, CorrelationSurface, Correlator,
};
pub use crate::fft::{next_fast_len, FftContext, PaddingMode};
pub use crate::image::{ImageView, OwnedImage, Sample};
pub use crate::peak::{find_peak, find_peaks, Peak, PEAK_EPSILON};
pub use crate::util::{Operand, TexCorrError, TexCorrResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
