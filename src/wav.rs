//! WAV file input and output.
//!
//! Reading accepts 8 to 32 bit integer PCM and 32-bit float files with any
//! channel count; channels are averaged down to mono. Writing always produces
//! mono 16-bit PCM.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;
use tracing::{debug, warn};

use crate::AudioBuffer;
use crate::fft_backend::FftNum;
use crate::utils::downmix_to_mono;

#[derive(Debug, Error)]
pub enum WavError {
    #[error("WAV I/O error: {0}")]
    Hound(#[from] hound::Error),

    #[error("unsupported WAV format: {bits}-bit {format:?} with {channels} channel(s)")]
    UnsupportedFormat {
        bits: u16,
        format: SampleFormat,
        channels: u16,
    },
}

/// Read a WAV file as a mono buffer normalized to [-1, 1].
pub fn read_wav<T: FftNum, P: AsRef<Path>>(path: P) -> Result<AudioBuffer<T>, WavError> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();

    let unsupported = WavError::UnsupportedFormat {
        bits: spec.bits_per_sample,
        format: spec.sample_format,
        channels: spec.channels,
    };
    if spec.channels == 0 {
        return Err(unsupported);
    }

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ 8..=32) => {
            let max_val = (1i64 << (bits - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<_, _>>()?
        }
        _ => return Err(unsupported),
    };

    let mono = downmix_to_mono(&interleaved, spec.channels as usize);
    debug!(
        path = %path.as_ref().display(),
        channels = spec.channels,
        bits = spec.bits_per_sample,
        sample_rate = spec.sample_rate,
        frames = mono.len(),
        "read WAV"
    );

    Ok(AudioBuffer::new(
        mono.into_iter().map(T::from_f64_lossy).collect(),
        spec.sample_rate,
    ))
}

/// Write `buffer` as mono 16-bit PCM, clamping samples to [-1, 1].
///
/// Non-finite samples are written as silence.
pub fn write_wav<T: FftNum, P: AsRef<Path>>(path: P, buffer: &AudioBuffer<T>) -> Result<(), WavError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path.as_ref(), spec)?;

    let mut clipped = 0usize;
    for &sample in &buffer.samples {
        let value = sample.to_f64().filter(|v| v.is_finite()).unwrap_or(0.0);
        if value.abs() > 1.0 {
            clipped += 1;
        }
        let pcm = (value.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16;
        writer.write_sample(pcm)?;
    }
    writer.finalize()?;

    if clipped > 0 {
        warn!(
            path = %path.as_ref().display(),
            clipped,
            total = buffer.len(),
            "samples clipped to [-1, 1] while encoding 16-bit PCM"
        );
    }

    Ok(())
}
