/*MIT License

Copyright (c) 2025 David Maseda Neira

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Phase-vocoder time stretching and pitch shifting for mono audio.
//!
//! The signal is cut into Hann-windowed frames of [`FFT_SIZE`] samples every
//! [`ANALYSIS_HOP`] samples, transformed, given new per-bin phases by a
//! [`PhaseTracker`], transformed back and overlap-added at a synthesis hop of
//! `ANALYSIS_HOP * time_scaling_factor`.
//!
//! ```no_run
//! use pvoc_rs::prelude::*;
//!
//! let input = AudioBuffer::new(vec![0.0f64; 44100], 44100);
//! let config = VocoderConfig::new(2.0, 1.0).expect("valid factors");
//! let output = PhaseVocoder::new(config).process(&input).expect("long enough input");
//! assert_eq!(output.len(), 88200);
//! ```

use thiserror::Error;

pub mod fft_backend;
pub mod overlap_add;
pub mod phase;
pub mod resample;
pub mod schedule;
pub mod utils;
pub mod vocoder;
#[cfg(feature = "visualization")]
pub mod visualization;
#[cfg(feature = "wav")]
pub mod wav;
pub mod window;

pub use fft_backend::{Complex, FftNum, FrequencyTransform, RustFftBackend, TransformBackend};
#[cfg(feature = "microfft-backend")]
pub use fft_backend::MicroFftBackend;
pub use overlap_add::OverlapAddAccumulator;
pub use phase::{PhaseTracker, wrap_phase};
pub use resample::resample_linear;
pub use schedule::{FramePosition, FrameScheduler};
pub use utils::downmix_to_mono;
pub use vocoder::{PhaseVocoder, PitchMode, VocoderConfig};
pub use window::Window;

pub mod prelude {
    pub use crate::{
        AudioBuffer, PhaseVocoder, PitchMode, RustFftBackend, VocoderConfig, VocoderError,
    };
}

/// Transform length used for every run
pub const FFT_SIZE: usize = 4096;

/// Distance between consecutive analysis frames (4:1 overlap)
pub const ANALYSIS_HOP: usize = FFT_SIZE / 4;

/// Shortest input the engine accepts
pub const MIN_INPUT_LEN: usize = ANALYSIS_HOP * 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VocoderError {
    #[error("input has {len} samples, at least {min_len} are required")]
    InvalidInput { len: usize, min_len: usize },

    #[error("{name} must be a positive finite number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("{backend} backend cannot plan a transform of size {size}")]
    UnsupportedTransformSize { backend: &'static str, size: usize },
}

pub type Result<T> = std::result::Result<T, VocoderError>;

/// Mono samples in roughly [-1, 1] plus their sample rate in Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer<T> {
    pub samples: Vec<T>,
    pub sample_rate: u32,
}

impl<T: FftNum> AudioBuffer<T> {
    pub fn new(samples: Vec<T>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// `len` zero samples
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![T::zero(); len], sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
