//! Separable 2D DFT over row-major complex buffers.
//!
//! The row pass transforms every row in place; the column pass transposes into
//! a second buffer, transforms the (now contiguous) columns, and transposes
//! back. Both passes hand rustfft a buffer holding many consecutive
//! transforms of the same length, which it processes in one call.

use rustfft::num_complex::Complex64;
use rustfft::{Fft, Length};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::sync::Arc;

/// Runs `fft` over every `fft.len()`-sized chunk of `data`.
pub(crate) fn process_chunks(
    fft: &Arc<dyn Fft<f64>>,
    data: &mut [Complex64],
    scratch: &mut [Complex64],
    parallel: bool,
) {
    if parallel && process_chunks_par(fft, data) {
        return;
    }
    fft.process_with_scratch(data, scratch);
}

/// Splits the chunks across the rayon pool with one scratch buffer per worker.
#[cfg(feature = "rayon")]
fn process_chunks_par(fft: &Arc<dyn Fft<f64>>, data: &mut [Complex64]) -> bool {
    let len = fft.len();
    let scratch_len = fft.get_inplace_scratch_len();
    data.par_chunks_mut(len).for_each_init(
        || vec![Complex64::new(0.0, 0.0); scratch_len],
        |local, chunk| fft.process_with_scratch(chunk, local),
    );
    true
}

#[cfg(not(feature = "rayon"))]
fn process_chunks_par(_fft: &Arc<dyn Fft<f64>>, _data: &mut [Complex64]) -> bool {
    false
}

/// Writes the transpose of a `width x height` row-major grid into `dst`.
pub(crate) fn transpose(src: &[Complex64], dst: &mut [Complex64], width: usize, height: usize) {
    debug_assert_eq!(src.len(), width * height);
    debug_assert_eq!(dst.len(), width * height);
    for (y, row) in src.chunks_exact(width).enumerate() {
        for (x, &value) in row.iter().enumerate() {
            dst[x * height + y] = value;
        }
    }
}

/// Naive O(n^2) 2D DFT used as a test oracle.
#[cfg(test)]
pub(crate) fn dft_2d_reference(
    data: &[Complex64],
    width: usize,
    height: usize,
    inverse: bool,
) -> Vec<Complex64> {
    let sign = if inverse { 1.0 } else { -1.0 };
    let mut out = vec![Complex64::new(0.0, 0.0); width * height];
    for v in 0..height {
        for u in 0..width {
            let mut acc = Complex64::new(0.0, 0.0);
            for y in 0..height {
                for x in 0..width {
                    let phase = sign
                        * 2.0
                        * std::f64::consts::PI
                        * ((u * x) as f64 / width as f64 + (v * y) as f64 / height as f64);
                    acc += data[y * width + x] * Complex64::from_polar(1.0, phase);
                }
            }
            out[v * width + u] = acc;
        }
    }
    out
}
