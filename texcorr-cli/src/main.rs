use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use texcorr::io::load_gray_image;
use texcorr::{CorrelationConfig, Correlator, PaddingMode, Peak};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Normalized cross-correlation of two grayscale images"
)]
struct Cli {
    /// First image (A).
    image_a: PathBuf,
    /// Second image (B).
    image_b: PathBuf,
    /// Padded transform size policy.
    #[arg(long, value_enum, default_value_t = PaddingArg::Fast)]
    padding: PaddingArg,
    /// Number of peaks to report.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    top_k: u64,
    /// Chebyshev radius for suppressing runner-up peaks.
    #[arg(long, default_value_t = 1)]
    nms_radius: usize,
    /// Parallelize the transform passes.
    #[arg(long)]
    parallel: bool,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PaddingArg {
    Fast,
    Minimal,
}

impl From<PaddingArg> for PaddingMode {
    fn from(value: PaddingArg) -> Self {
        match value {
            PaddingArg::Fast => PaddingMode::Fast,
            PaddingArg::Minimal => PaddingMode::Minimal,
        }
    }
}

#[derive(Debug, Serialize)]
struct PeakRecord {
    value: f32,
    x: usize,
    y: usize,
    shift_x: isize,
    shift_y: isize,
}

#[derive(Debug, Serialize)]
struct Output {
    surface_width: usize,
    surface_height: usize,
    best: PeakRecord,
    peaks: Vec<PeakRecord>,
}

/// Plain output: `value x y` on one line.
fn peak_line(peak: &Peak) -> String {
    format!("{} {} {}", peak.value, peak.x, peak.y)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("texcorr=info".parse()?))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let image_a = load_gray_image(&cli.image_a)?;
    let image_b = load_gray_image(&cli.image_b)?;

    let mut correlator = Correlator::new().with_config(CorrelationConfig {
        padding: cli.padding.into(),
        parallel: cli.parallel,
        ..CorrelationConfig::default()
    });
    let surface = correlator.correlate(image_a.view(), image_b.view())?;
    let best = surface.peak()?;

    let record = |peak: Peak| {
        let (shift_x, shift_y) = surface.relative_shift(peak.x, peak.y);
        PeakRecord {
            value: peak.value,
            x: peak.x,
            y: peak.y,
            shift_x,
            shift_y,
        }
    };

    let top_k = usize::try_from(cli.top_k)?;
    let runners_up: Vec<Peak> = if top_k > 1 {
        surface
            .peaks(top_k, cli.nms_radius)
            .into_iter()
            .filter(|peak| (peak.x, peak.y) != (best.x, best.y))
            .take(top_k - 1)
            .collect()
    } else {
        Vec::new()
    };

    if cli.json {
        let output = Output {
            surface_width: surface.width(),
            surface_height: surface.height(),
            best: record(best),
            peaks: std::iter::once(best)
                .chain(runners_up)
                .map(record)
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for peak in std::iter::once(best).chain(runners_up) {
            println!("{}", peak_line(&peak));
        }
    }

    Ok(())
}
