//! pvoc - time-stretch and pitch-shift a WAV file with a phase vocoder

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use pvoc_rs::wav::{read_wav, write_wav};
use pvoc_rs::{PhaseVocoder, PitchMode, VocoderConfig};

/// Phase-vocoder time stretching and pitch shifting for WAV files.
///
/// By default both factors are user-facing: TIME_SCALE 2 makes the output
/// play twice as fast (half as long) and PITCH_SHIFT 2 divides the pitch
/// factor by two. Pass --literal to hand the values to the engine unchanged.
#[derive(Parser)]
#[command(name = "pvoc")]
#[command(author, version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Input WAV file (any channel count, downmixed to mono)
    input: PathBuf,

    /// Output WAV file (mono, 16-bit PCM)
    output: PathBuf,

    /// Time stretch factor
    time_scale: f64,

    /// Pitch shift factor
    pitch_shift: f64,

    /// Use the factors as engine factors instead of their reciprocals
    #[arg(long)]
    literal: bool,

    /// How the pitch factor is applied
    #[arg(long, value_enum, default_value_t = PitchArg::Phase)]
    pitch_mode: PitchArg,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PitchArg {
    /// Scale phase increments during resynthesis
    Phase,
    /// Stretch, then resample by the pitch factor
    Resample,
}

impl From<PitchArg> for PitchMode {
    fn from(arg: PitchArg) -> Self {
        match arg {
            PitchArg::Phase => PitchMode::PhaseScaling,
            PitchArg::Resample => PitchMode::Resample,
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
    let config = if cli.literal {
        VocoderConfig::new(cli.time_scale, cli.pitch_shift)
    } else {
        VocoderConfig::from_user_factors(cli.time_scale, cli.pitch_shift)
    };
    let config = config
        .context("invalid scaling factors")?
        .with_pitch_mode(cli.pitch_mode.into());

    let input = read_wav::<f32, _>(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    info!(
        samples = input.len(),
        sample_rate = input.sample_rate,
        seconds = input.duration_secs(),
        "loaded input"
    );

    let output = PhaseVocoder::new(config)
        .process(&input)
        .with_context(|| format!("failed to process {}", cli.input.display()))?;

    write_wav(&cli.output, &output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(
        samples = output.len(),
        seconds = output.duration_secs(),
        time_scaling_factor = config.time_scaling_factor,
        pitch_shift_factor = config.pitch_shift_factor,
        "wrote {}",
        cli.output.display()
    );

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
