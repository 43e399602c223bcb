//! pvoc-plot - render the spectrogram of a WAV file as a PNG image

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use pvoc_rs::RustFftBackend;
use pvoc_rs::visualization::{ColorMap, PLOT_FFT_SIZE, PLOT_HOP, Spectrogram, VisualizationConfig};
use pvoc_rs::wav::read_wav;

/// Plot a dB magnitude spectrogram of a WAV file (time on x, frequency on y).
#[derive(Parser)]
#[command(name = "pvoc-plot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input WAV file (any channel count, downmixed to mono)
    input: PathBuf,

    /// Output image (PNG)
    output: PathBuf,

    /// Samples per analysis frame
    #[arg(long, default_value_t = PLOT_FFT_SIZE)]
    fft_size: usize,

    /// Samples between frames
    #[arg(long, default_value_t = PLOT_HOP)]
    hop: usize,

    #[arg(long, value_enum, default_value_t = ColorArg::Viridis)]
    colormap: ColorArg,

    /// Image width in pixels (default: one per frame)
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (default: one per frequency bin)
    #[arg(long)]
    height: Option<u32>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Viridis,
    Magma,
    Inferno,
    Plasma,
    Grayscale,
}

impl From<ColorArg> for ColorMap {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Viridis => ColorMap::Viridis,
            ColorArg::Magma => ColorMap::Magma,
            ColorArg::Inferno => ColorMap::Inferno,
            ColorArg::Plasma => ColorMap::Plasma,
            ColorArg::Grayscale => ColorMap::Grayscale,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}

fn run(cli: &Cli) -> Result<()> {
    let input = read_wav::<f32, _>(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let spectrogram = Spectrogram::compute(
        &RustFftBackend,
        &input.samples,
        input.sample_rate,
        cli.fft_size,
        cli.hop,
    )
    .context("failed to compute spectrogram")?;

    let (min_db, max_db) = spectrogram.db_range();
    info!(
        frames = spectrogram.num_frames(),
        bins = spectrogram.freq_bins(),
        min_db,
        max_db,
        "computed spectrogram"
    );

    let config = VisualizationConfig {
        colormap: cli.colormap.into(),
        width: cli.width,
        height: cli.height,
        db_range: None,
    };
    spectrogram
        .save_image_with(&cli.output, &config)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!("wrote {}", cli.output.display());

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
