//! The phase vocoder engine: analysis, phase modification and resynthesis.

use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::fft_backend::{Complex, FftNum, FrequencyTransform, RustFftBackend, TransformBackend};
use crate::overlap_add::OverlapAddAccumulator;
use crate::phase::PhaseTracker;
use crate::resample::resample_linear;
use crate::schedule::FrameScheduler;
use crate::window::Window;
use crate::{ANALYSIS_HOP, AudioBuffer, FFT_SIZE, MIN_INPUT_LEN, Result, VocoderError};

/// How `pitch_shift_factor` is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitchMode {
    /// Scale each bin's phase increment by the pitch factor while
    /// resynthesizing. Duration is controlled by the time factor alone.
    #[default]
    PhaseScaling,
    /// Stretch by `time * pitch` with unscaled phases, then resample by
    /// `pitch` with linear interpolation. Moves every partial by exactly the
    /// pitch factor.
    Resample,
}

/// Scaling factors for one vocoder run.
///
/// The factors have literal semantics: output length is
/// `round(input_len * time_scaling_factor)`, and phase increments are
/// multiplied by `pitch_shift_factor`. Use
/// [`from_user_factors`](Self::from_user_factors) for the reciprocal
/// convention of the command-line tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VocoderConfig {
    pub time_scaling_factor: f64,
    pub pitch_shift_factor: f64,
    pub pitch_mode: PitchMode,
}

impl VocoderConfig {
    pub fn new(time_scaling_factor: f64, pitch_shift_factor: f64) -> Result<Self> {
        let config = Self {
            time_scaling_factor,
            pitch_shift_factor,
            pitch_mode: PitchMode::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Factors of 1: output reproduces the input.
    pub fn identity() -> Self {
        Self {
            time_scaling_factor: 1.0,
            pitch_shift_factor: 1.0,
            pitch_mode: PitchMode::default(),
        }
    }

    /// Build a config from user-facing factors, which the engine receives as
    /// reciprocals: `time_scaling_factor = 1 / stretch` and
    /// `pitch_shift_factor = 1 / shift`.
    ///
    /// ```
    /// use pvoc_rs::VocoderConfig;
    ///
    /// let config = VocoderConfig::from_user_factors(2.0, 0.5).unwrap();
    /// assert_eq!(config.time_scaling_factor, 0.5);
    /// assert_eq!(config.pitch_shift_factor, 2.0);
    /// ```
    pub fn from_user_factors(stretch: f64, shift: f64) -> Result<Self> {
        check_factor("time_stretch", stretch)?;
        check_factor("pitch_shift", shift)?;
        Self::new(1.0 / stretch, 1.0 / shift)
    }

    pub fn with_pitch_mode(mut self, pitch_mode: PitchMode) -> Self {
        self.pitch_mode = pitch_mode;
        self
    }

    /// Both factors must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        check_factor("time_scaling_factor", self.time_scaling_factor)?;
        check_factor("pitch_shift_factor", self.pitch_shift_factor)
    }

    /// Number of samples a run over `input_len` samples produces.
    pub fn output_len(&self, input_len: usize) -> usize {
        FrameScheduler::output_len(input_len, self.time_scaling_factor)
    }
}

impl Default for VocoderConfig {
    fn default() -> Self {
        Self::identity()
    }
}

fn check_factor(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VocoderError::InvalidParameter { name, value })
    }
}

/// Time-stretching and pitch-shifting engine.
///
/// Holds no state between calls: every [`process`](Self::process) plans its
/// own transform and starts from zeroed phase state, so one engine can be
/// shared and reused.
#[derive(Debug, Clone)]
pub struct PhaseVocoder<T, B = RustFftBackend> {
    config: VocoderConfig,
    backend: B,
    _marker: PhantomData<T>,
}

impl<T: FftNum> PhaseVocoder<T, RustFftBackend> {
    pub fn new(config: VocoderConfig) -> Self {
        Self::with_backend(config, RustFftBackend)
    }
}

impl<T: FftNum, B: TransformBackend<T>> PhaseVocoder<T, B> {
    pub fn with_backend(config: VocoderConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            _marker: PhantomData,
        }
    }

    pub fn config(&self) -> &VocoderConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Transform `input` into a new buffer at the same sample rate.
    ///
    /// # Errors
    ///
    /// - [`VocoderError::InvalidParameter`] for a non-positive or non-finite factor
    /// - [`VocoderError::InvalidInput`] for fewer than [`MIN_INPUT_LEN`] samples
    /// - [`VocoderError::UnsupportedTransformSize`] if the backend cannot plan [`FFT_SIZE`]
    pub fn process(&self, input: &AudioBuffer<T>) -> Result<AudioBuffer<T>> {
        let samples = self.process_samples(&input.samples)?;
        Ok(AudioBuffer::new(samples, input.sample_rate))
    }

    /// Same as [`process`](Self::process) on bare samples.
    pub fn process_samples(&self, input: &[T]) -> Result<Vec<T>> {
        self.config.validate()?;

        let time_scale = self.config.time_scaling_factor;
        let pitch_shift = self.config.pitch_shift_factor;

        match self.config.pitch_mode {
            PitchMode::PhaseScaling => self.run(input, time_scale, pitch_shift),
            PitchMode::Resample => {
                let stretch = time_scale * pitch_shift;
                check_factor("time_scaling_factor * pitch_shift_factor", stretch)?;

                let stretched = self.run(input, stretch, 1.0)?;
                let output_len = self.config.output_len(input.len());
                debug!(
                    stretched_len = stretched.len(),
                    output_len,
                    step = pitch_shift,
                    "resampling stretched signal"
                );
                Ok(resample_linear(&stretched, pitch_shift, output_len))
            }
        }
    }

    fn run(&self, input: &[T], time_scale: f64, pitch_shift: f64) -> Result<Vec<T>> {
        if input.len() < MIN_INPUT_LEN {
            return Err(VocoderError::InvalidInput {
                len: input.len(),
                min_len: MIN_INPUT_LEN,
            });
        }

        let window = Window::<T>::hann(FFT_SIZE);
        let mut transform = self.backend.plan(FFT_SIZE)?;

        let scheduler = FrameScheduler::new(input.len(), ANALYSIS_HOP, time_scale);
        let mut tracker = PhaseTracker::<T>::new(FFT_SIZE, ANALYSIS_HOP, pitch_shift);

        // Gain at the output frame spacing, floored at 1
        let synthesis_hop = (ANALYSIS_HOP as f64 * time_scale).round().max(1.0) as usize;
        let gain = window.overlap_gain(synthesis_hop).max(T::one());
        let mut accumulator = OverlapAddAccumulator::new(
            FrameScheduler::output_len(input.len(), time_scale),
            FFT_SIZE,
            gain,
        );
        let mut frame = vec![Complex::new(T::zero(), T::zero()); FFT_SIZE];

        debug!(
            backend = self.backend.name(),
            input_len = input.len(),
            output_len = accumulator.len(),
            frames = scheduler.frame_count(),
            synthesis_hop,
            time_scale,
            pitch_shift,
            "phase vocoder run"
        );

        for position in scheduler.positions() {
            trace!(
                frame = position.index,
                analysis_offset = position.analysis_offset,
                synthesis_offset = position.synthesis_offset,
                "frame"
            );

            window.apply(input, position.analysis_offset, &mut frame);
            transform.forward(&mut frame);
            tracker.process(&mut frame);
            transform.inverse(&mut frame);
            accumulator.accumulate(position.synthesis_offset, &frame, &window);
        }

        Ok(accumulator.into_output())
    }
}
