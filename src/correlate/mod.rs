//! FFT-based normalized cross-correlation.
//!
//! Both operands are zero-meaned over their own samples, zero-padded to a
//! common `W x H` grid with `W >= A.w + B.w - 1` and `H >= A.h + B.h - 1`,
//! transformed, multiplied as `F_A * conj(F_B)`, and transformed back. The
//! resulting cyclic correlation `r[k] = sum_m a[m + k] * b[m]` is read at the
//! valid (fully overlapping) offsets and divided by
//! `sqrt(sum a'^2) * sqrt(sum b'^2)`.

use crate::fft::{padded_len, FftContext, PaddingMode};
use crate::image::{ImageView, OwnedImage, Sample};
use crate::trace::{trace_event, trace_span};
use crate::util::math::NeumaierSum;
use crate::util::{Operand, TexCorrError, TexCorrResult};
use rustfft::num_complex::Complex64;

mod surface;

pub use surface::CorrelationSurface;

/// Correlation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrelationConfig {
    /// Padded transform size policy.
    pub padding: PaddingMode,
    /// Ratio of centered energy to raw energy (`Σ(x - mean)² / Σx²`) at or
    /// below which an operand is degenerate. Independent of sample scale.
    pub min_relative_energy: f64,
    /// Split transform passes across the rayon pool (needs the `rayon` feature).
    pub parallel: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            padding: PaddingMode::Fast,
            min_relative_energy: 1e-12,
            parallel: false,
        }
    }
}

/// Reusable correlator owning its transform context.
#[derive(Debug, Default)]
pub struct Correlator {
    ctx: FftContext,
    config: CorrelationConfig,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the correlation settings.
    pub fn with_config(mut self, config: CorrelationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Transform context shared by successive calls.
    pub fn context(&self) -> &FftContext {
        &self.ctx
    }

    /// Correlates `a` against `b`, reusing plans and scratch from earlier calls.
    pub fn correlate<TA: Sample, TB: Sample>(
        &mut self,
        a: ImageView<'_, TA>,
        b: ImageView<'_, TB>,
    ) -> TexCorrResult<CorrelationSurface> {
        correlate_with(&mut self.ctx, &self.config, a, b)
    }
}

/// Correlates `a` against `b` with default settings and a throwaway context.
pub fn correlate<TA: Sample, TB: Sample>(
    a: ImageView<'_, TA>,
    b: ImageView<'_, TB>,
) -> TexCorrResult<CorrelationSurface> {
    correlate_with(&mut FftContext::new(), &CorrelationConfig::default(), a, b)
}

/// Mean and zero-mean energy of one operand.
#[derive(Clone, Copy, Debug)]
struct RasterStats {
    mean: f64,
    energy: f64,
}

impl RasterStats {
    fn measure<T: Sample>(
        view: ImageView<'_, T>,
        which: Operand,
        min_relative_energy: f64,
    ) -> TexCorrResult<Self> {
        let count = view.len() as f64;
        let mut sum = NeumaierSum::default();
        for row in view.rows() {
            for &v in row {
                sum.add(v.to_f64());
            }
        }
        let mean = sum.total() / count;

        let mut energy = NeumaierSum::default();
        let mut raw = NeumaierSum::default();
        for row in view.rows() {
            for &v in row {
                let x = v.to_f64();
                let d = x - mean;
                energy.add(d * d);
                raw.add(x * x);
            }
        }
        let energy = energy.total();
        let variance = energy / count;
        // Centered against raw energy, so the test is scale-free.
        // Negated so NaN input is rejected too.
        if !(energy > min_relative_energy * raw.total()) {
            return Err(TexCorrError::DegenerateInput { which, variance });
        }
        Ok(Self { mean, energy })
    }
}

/// Writes the zero-meaned operand into the top-left corner of a zeroed buffer.
fn fill_padded<T: Sample>(
    view: ImageView<'_, T>,
    mean: f64,
    buffer: &mut [Complex64],
    pad_width: usize,
) {
    for (y, row) in view.rows().enumerate() {
        let dst = &mut buffer[y * pad_width..y * pad_width + row.len()];
        for (out, &v) in dst.iter_mut().zip(row) {
            *out = Complex64::new(v.to_f64() - mean, 0.0);
        }
    }
}

/// Index into the cyclic correlation for surface offset `k` along one axis.
fn wrapped_index(k: usize, a_spans: bool, padded: usize) -> usize {
    if a_spans {
        k
    } else {
        (padded - k) % padded
    }
}

/// Correlates `a` against `b` using a caller-owned context and settings.
///
/// Neither input is modified. Scratch buffers are taken from `ctx` and handed
/// back before returning, on success and on failure.
pub fn correlate_with<TA: Sample, TB: Sample>(
    ctx: &mut FftContext,
    config: &CorrelationConfig,
    a: ImageView<'_, TA>,
    b: ImageView<'_, TB>,
) -> TexCorrResult<CorrelationSurface> {
    let _span = trace_span!(
        "correlate",
        a_width = a.width(),
        a_height = a.height(),
        b_width = b.width(),
        b_height = b.height()
    )
    .entered();

    let stats_a = RasterStats::measure(a, Operand::A, config.min_relative_energy)?;
    let stats_b = RasterStats::measure(b, Operand::B, config.min_relative_energy)?;
    trace_event!(
        "operand_energy",
        energy_a = stats_a.energy,
        energy_b = stats_b.energy
    );

    let overflow = TexCorrError::AllocationFailed { bytes: usize::MAX };
    let pad_width =
        padded_len(a.width(), b.width(), config.padding).ok_or_else(|| overflow.clone())?;
    let pad_height =
        padded_len(a.height(), b.height(), config.padding).ok_or_else(|| overflow.clone())?;
    let len = pad_width.checked_mul(pad_height).ok_or(overflow)?;
    trace_event!("padded_size", width = pad_width, height = pad_height);

    let (mut spec_a, mut spec_b) = ctx.checkout_pair(len, len)?;

    let result = correlate_padded(
        ctx,
        config,
        (a, stats_a),
        (b, stats_b),
        &mut spec_a,
        &mut spec_b,
        pad_width,
        pad_height,
    );

    ctx.release(spec_b);
    ctx.release(spec_a);
    result
}

#[allow(clippy::too_many_arguments)]
fn correlate_padded<TA: Sample, TB: Sample>(
    ctx: &mut FftContext,
    config: &CorrelationConfig,
    (a, stats_a): (ImageView<'_, TA>, RasterStats),
    (b, stats_b): (ImageView<'_, TB>, RasterStats),
    spec_a: &mut [Complex64],
    spec_b: &mut [Complex64],
    pad_width: usize,
    pad_height: usize,
) -> TexCorrResult<CorrelationSurface> {
    fill_padded(a, stats_a.mean, spec_a, pad_width);
    fill_padded(b, stats_b.mean, spec_b, pad_width);

    ctx.forward_2d(spec_a, pad_width, pad_height, config.parallel)?;
    ctx.forward_2d(spec_b, pad_width, pad_height, config.parallel)?;
    for (fa, fb) in spec_a.iter_mut().zip(spec_b.iter()) {
        *fa *= fb.conj();
    }
    ctx.inverse_2d(spec_a, pad_width, pad_height, config.parallel)?;

    let out_width = a.width().abs_diff(b.width()) + 1;
    let out_height = a.height().abs_diff(b.height()) + 1;
    let a_spans_x = a.width() >= b.width();
    let a_spans_y = a.height() >= b.height();
    let denom = stats_a.energy.sqrt() * stats_b.energy.sqrt();

    let mut values = Vec::with_capacity(out_width * out_height);
    for y in 0..out_height {
        let row = wrapped_index(y, a_spans_y, pad_height) * pad_width;
        for x in 0..out_width {
            let col = wrapped_index(x, a_spans_x, pad_width);
            values.push((spec_a[row + col].re / denom) as f32);
        }
    }

    let values = OwnedImage::new(values, out_width, out_height)?;
    Ok(CorrelationSurface::new(values, a_spans_x, a_spans_y))
}
