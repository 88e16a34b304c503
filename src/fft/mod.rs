//! Caller-owned FFT state: plan cache and scratch-buffer pool.
//!
//! An [`FftContext`] replaces any process-wide transform state. Each
//! correlation borrows one mutably, so independent contexts can be used from
//! different threads without coordination.

use crate::trace::{trace_debug, trace_span};
use crate::util::{TexCorrError, TexCorrResult};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};
use std::fmt;

mod size;
pub(crate) mod transform;

pub use size::{next_fast_len, PaddingMode};
pub(crate) use size::padded_len;

/// Default number of released buffers retained for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 4;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Transform plans and reusable scratch memory for 2D DFTs.
pub struct FftContext {
    planner: FftPlanner<f64>,
    pool: Vec<Vec<Complex64>>,
    max_pooled: usize,
}

impl fmt::Debug for FftContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftContext")
            .field("pooled", &self.pool.len())
            .field("max_pooled", &self.max_pooled)
            .finish()
    }
}

impl Default for FftContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FftContext {
    /// Creates a context with the default pool capacity.
    pub fn new() -> Self {
        Self::with_pool_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Creates a context that keeps at most `max_pooled` released buffers.
    ///
    /// A capacity of zero disables pooling; every buffer is freed on release.
    pub fn with_pool_capacity(max_pooled: usize) -> Self {
        Self {
            planner: FftPlanner::new(),
            pool: Vec::with_capacity(max_pooled),
            max_pooled,
        }
    }

    /// Number of buffers currently held for reuse.
    pub fn pooled_buffers(&self) -> usize {
        self.pool.len()
    }

    /// Drops all pooled buffers.
    pub fn clear_pool(&mut self) {
        self.pool.clear();
    }

    /// Hands out a zero-filled buffer of `len` elements.
    ///
    /// Reuses a pooled allocation when one exists; otherwise reserves fresh
    /// memory and reports failure instead of aborting.
    pub(crate) fn checkout(&mut self, len: usize) -> TexCorrResult<Vec<Complex64>> {
        let mut buffer = self.pool.pop().unwrap_or_default();
        buffer.clear();
        if buffer.capacity() < len {
            let bytes = len.saturating_mul(std::mem::size_of::<Complex64>());
            buffer
                .try_reserve_exact(len)
                .map_err(|_| TexCorrError::AllocationFailed { bytes })?;
        }
        buffer.resize(len, ZERO);
        Ok(buffer)
    }

    /// Checks out two buffers, returning the first to the pool if the second fails.
    pub(crate) fn checkout_pair(
        &mut self,
        first_len: usize,
        second_len: usize,
    ) -> TexCorrResult<(Vec<Complex64>, Vec<Complex64>)> {
        let first = self.checkout(first_len)?;
        match self.checkout(second_len) {
            Ok(second) => Ok((first, second)),
            Err(err) => {
                self.release(first);
                Err(err)
            }
        }
    }

    /// Returns a buffer to the pool, or frees it when the pool is full.
    pub(crate) fn release(&mut self, buffer: Vec<Complex64>) {
        if self.pool.len() < self.max_pooled {
            self.pool.push(buffer);
        }
    }

    /// Forward 2D DFT of a `width x height` row-major buffer, in place.
    pub(crate) fn forward_2d(
        &mut self,
        data: &mut [Complex64],
        width: usize,
        height: usize,
        parallel: bool,
    ) -> TexCorrResult<()> {
        self.transform_2d(data, width, height, FftDirection::Forward, parallel)
    }

    /// Inverse 2D DFT scaled by `1 / (width * height)`, in place.
    pub(crate) fn inverse_2d(
        &mut self,
        data: &mut [Complex64],
        width: usize,
        height: usize,
        parallel: bool,
    ) -> TexCorrResult<()> {
        self.transform_2d(data, width, height, FftDirection::Inverse, parallel)?;
        let scale = 1.0 / (width * height) as f64;
        for value in data.iter_mut() {
            *value *= scale;
        }
        Ok(())
    }

    fn transform_2d(
        &mut self,
        data: &mut [Complex64],
        width: usize,
        height: usize,
        direction: FftDirection,
        parallel: bool,
    ) -> TexCorrResult<()> {
        let len = width
            .checked_mul(height)
            .ok_or(TexCorrError::InvalidDimensions { width, height })?;
        if width == 0 || height == 0 || data.len() != len {
            return Err(TexCorrError::InvalidDimensions { width, height });
        }
        let _span = trace_span!("fft_2d", width = width, height = height).entered();

        let row_fft = self.planner.plan_fft(width, direction);
        let col_fft = self.planner.plan_fft(height, direction);
        let scratch_len = row_fft
            .get_inplace_scratch_len()
            .max(col_fft.get_inplace_scratch_len());
        trace_debug!("fft_plans", scratch_len = scratch_len, parallel = parallel);

        let (mut scratch, mut columns) = self.checkout_pair(scratch_len, len)?;

        transform::process_chunks(&row_fft, data, &mut scratch, parallel);
        transform::transpose(data, &mut columns, width, height);
        transform::process_chunks(&col_fft, &mut columns, &mut scratch, parallel);
        transform::transpose(&columns, data, height, width);

        self.release(columns);
        self.release(scratch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::transform::dft_2d_reference;
    use super::FftContext;
    use rustfft::num_complex::Complex64;

    fn sample_grid(width: usize, height: usize) -> Vec<Complex64> {
        (0..width * height)
            .map(|i| Complex64::new(((i * 7) % 11) as f64 - 5.0, ((i * 3) % 5) as f64))
            .collect()
    }

    fn max_abs_diff(a: &[Complex64], b: &[Complex64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn forward_matches_naive_dft() {
        let (width, height) = (6, 5);
        let input = sample_grid(width, height);
        let mut data = input.clone();
        let mut ctx = FftContext::new();
        ctx.forward_2d(&mut data, width, height, false).unwrap();
        let expected = dft_2d_reference(&input, width, height, false);
        assert!(max_abs_diff(&data, &expected) < 1e-9);
    }

    #[test]
    fn inverse_undoes_forward() {
        let (width, height) = (9, 4);
        let input = sample_grid(width, height);
        let mut data = input.clone();
        let mut ctx = FftContext::new();
        ctx.forward_2d(&mut data, width, height, false).unwrap();
        ctx.inverse_2d(&mut data, width, height, false).unwrap();
        assert!(max_abs_diff(&data, &input) < 1e-9);
    }

    #[test]
    fn mismatched_length_is_rejected() {
        let mut data = sample_grid(3, 3);
        let mut ctx = FftContext::new();
        assert!(ctx.forward_2d(&mut data, 4, 3, false).is_err());
    }

    #[test]
    fn pool_is_bounded_and_reused() {
        let mut ctx = FftContext::with_pool_capacity(1);
        let a = ctx.checkout(16).unwrap();
        let b = ctx.checkout(8).unwrap();
        ctx.release(a);
        ctx.release(b);
        assert_eq!(ctx.pooled_buffers(), 1);

        let reused = ctx.checkout(4).unwrap();
        assert_eq!(reused.len(), 4);
        assert!(reused.iter().all(|c| c.re == 0.0 && c.im == 0.0));
        assert_eq!(ctx.pooled_buffers(), 0);
    }

    #[test]
    fn zero_capacity_pool_frees_everything() {
        let mut ctx = FftContext::with_pool_capacity(0);
        let buffer = ctx.checkout(8).unwrap();
        ctx.release(buffer);
        assert_eq!(ctx.pooled_buffers(), 0);
    }

    #[test]
    fn huge_request_reports_allocation_failure() {
        let mut ctx = FftContext::new();
        let err = ctx.checkout(usize::MAX / 4).unwrap_err();
        assert!(matches!(
            err,
            crate::util::TexCorrError::AllocationFailed { .. }
        ));
    }

    #[test]
    fn failed_pair_checkout_returns_first_buffer() {
        let mut ctx = FftContext::with_pool_capacity(2);
        let err = ctx.checkout_pair(8, usize::MAX / 4).unwrap_err();
        assert!(matches!(
            err,
            crate::util::TexCorrError::AllocationFailed { .. }
        ));
        assert_eq!(ctx.pooled_buffers(), 1);

        let (first, second) = ctx.checkout_pair(8, 8).unwrap();
        assert_eq!(ctx.pooled_buffers(), 0);
        ctx.release(first);
        ctx.release(second);
        assert_eq!(ctx.pooled_buffers(), 2);
    }
}
