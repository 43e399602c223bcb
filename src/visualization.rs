//! Spectrogram rendering for inspecting input and output signals.
//!
//! [`Spectrogram::compute`] runs a centred short-time transform (frames
//! `hop` samples apart, zero padding of half a frame on both sides) and keeps
//! the magnitude of every non-negative frequency bin in decibels, floored
//! [`TOP_DB`] below the loudest bin. The image puts time on the x axis and
//! frequency on the y axis, low frequencies at the bottom.

use std::path::Path;

use image::{ImageBuffer, Rgb};
use thiserror::Error;

use crate::fft_backend::{Complex, FftNum, FrequencyTransform, RustFftBackend, TransformBackend};
use crate::window::Window;
use crate::{AudioBuffer, Result, VocoderError};

/// Frame length used by [`Spectrogram::from_buffer`]
pub const PLOT_FFT_SIZE: usize = 2048;

/// Frame distance used by [`Spectrogram::from_buffer`]
pub const PLOT_HOP: usize = 512;

/// Dynamic range kept below the loudest bin
pub const TOP_DB: f32 = 80.0;

/// Smallest magnitude converted to decibels (-100 dB)
const AMIN: f64 = 1e-5;

#[derive(Debug, Error)]
pub enum VisualizationError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMap {
    #[default]
    Viridis,
    Magma,
    Inferno,
    Plasma,
    Grayscale,
}

impl ColorMap {
    fn to_gradient(self) -> Box<dyn colorgrad::Gradient> {
        use colorgrad::preset::*;
        match self {
            ColorMap::Viridis => Box::new(viridis()),
            ColorMap::Magma => Box::new(magma()),
            ColorMap::Inferno => Box::new(inferno()),
            ColorMap::Plasma => Box::new(plasma()),
            ColorMap::Grayscale => Box::new(greys()),
        }
    }

    /// Pixel colour for a level in [0, 1].
    pub fn rgb(self, level: f32) -> Rgb<u8> {
        to_rgb(self.to_gradient().as_ref(), level)
    }
}

fn to_rgb(gradient: &dyn colorgrad::Gradient, level: f32) -> Rgb<u8> {
    let color = gradient.at(level.clamp(0.0, 1.0));
    Rgb([
        (color.r * 255.0) as u8,
        (color.g * 255.0) as u8,
        (color.b * 255.0) as u8,
    ])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizationConfig {
    pub colormap: ColorMap,
    /// None = 1 pixel per frame
    pub width: Option<u32>,
    /// None = 1 pixel per frequency bin
    pub height: Option<u32>,
    /// (min_db, max_db) for colour mapping; None = the spectrogram's own range
    pub db_range: Option<(f32, f32)>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            colormap: ColorMap::Viridis,
            width: None,
            height: None,
            db_range: None,
        }
    }
}

/// Magnitudes in dB, stored frame-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    num_frames: usize,
    freq_bins: usize,
    fft_size: usize,
    hop: usize,
    sample_rate: u32,
    db: Vec<f32>,
}

impl Spectrogram {
    /// Spectrogram of `buffer` with [`PLOT_FFT_SIZE`] and [`PLOT_HOP`].
    pub fn from_buffer<T: FftNum>(buffer: &AudioBuffer<T>) -> Result<Self> {
        Self::compute(
            &RustFftBackend,
            &buffer.samples,
            buffer.sample_rate,
            PLOT_FFT_SIZE,
            PLOT_HOP,
        )
    }

    /// Centred STFT of `signal`: `1 + len / hop` frames of `fft_size / 2 + 1` bins.
    pub fn compute<T: FftNum, B: TransformBackend<T>>(
        backend: &B,
        signal: &[T],
        sample_rate: u32,
        fft_size: usize,
        hop: usize,
    ) -> Result<Self> {
        if hop == 0 {
            return Err(VocoderError::InvalidParameter {
                name: "hop",
                value: 0.0,
            });
        }
        if fft_size == 0 {
            return Err(VocoderError::InvalidParameter {
                name: "fft_size",
                value: 0.0,
            });
        }

        let mut transform = backend.plan(fft_size)?;
        let window = Window::<T>::hann(fft_size);

        let pad = fft_size / 2;
        let mut padded = vec![T::zero(); signal.len() + 2 * pad];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        let num_frames = 1 + signal.len() / hop;
        let freq_bins = fft_size / 2 + 1;
        let mut db = Vec::with_capacity(num_frames * freq_bins);
        let mut frame = vec![Complex::new(T::zero(), T::zero()); fft_size];

        for frame_idx in 0..num_frames {
            window.apply(&padded, frame_idx * hop, &mut frame);
            transform.forward(&mut frame);

            for bin in &frame[..freq_bins] {
                let magnitude = bin.norm().to_f64().unwrap_or(0.0).max(AMIN);
                db.push((20.0 * magnitude.log10()) as f32);
            }
        }

        let max_db = db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let floor = max_db - TOP_DB;
        for value in db.iter_mut() {
            *value = value.max(floor);
        }

        Ok(Self {
            num_frames,
            freq_bins,
            fft_size,
            hop,
            sample_rate,
            db,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn freq_bins(&self) -> usize {
        self.freq_bins
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn db(&self, frame: usize, bin: usize) -> f32 {
        self.db[frame * self.freq_bins + bin]
    }

    /// Centre frequency of `bin` in Hz
    pub fn bin_frequency(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate as f64 / self.fft_size as f64
    }

    /// Loudest bin of `frame`
    pub fn peak_bin(&self, frame: usize) -> usize {
        let row = &self.db[frame * self.freq_bins..(frame + 1) * self.freq_bins];
        row.iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (bin, &db)| {
                if db > best.1 { (bin, db) } else { best }
            })
            .0
    }

    /// (min_db, max_db) over every frame and bin
    pub fn db_range(&self) -> (f32, f32) {
        self.db
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// `db(frame, bin)` mapped linearly from `db_range` onto [0, 1].
    pub fn level(&self, frame: usize, bin: usize, db_range: (f32, f32)) -> f32 {
        let (min_db, max_db) = db_range;
        let range = max_db - min_db;
        if range <= 0.0 {
            return 1.0;
        }
        ((self.db(frame, bin) - min_db) / range).clamp(0.0, 1.0)
    }

    /// Image row that shows `bin` when the image is `height` pixels tall.
    pub fn row_of_bin(&self, bin: usize, height: u32) -> u32 {
        let row = (bin as u64 * height as u64 / self.freq_bins as u64) as u32;
        height - 1 - row.min(height - 1)
    }

    pub fn to_image(&self) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        self.to_image_with(&VisualizationConfig::default())
    }

    pub fn to_image_with(&self, config: &VisualizationConfig) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        let gradient = config.colormap.to_gradient();
        let db_range = config.db_range.unwrap_or_else(|| self.db_range());

        let width = config.width.unwrap_or(self.num_frames as u32).max(1);
        let height = config.height.unwrap_or(self.freq_bins as u32).max(1);

        let mut img = ImageBuffer::new(width, height);
        for y in 0..height {
            // Flip Y axis to have low freq at the bottom
            let bin = ((height - 1 - y) as u64 * self.freq_bins as u64 / height as u64) as usize;
            for x in 0..width {
                let frame = (x as u64 * self.num_frames as u64 / width as u64) as usize;
                let level = self.level(frame, bin, db_range);
                img.put_pixel(x, y, to_rgb(gradient.as_ref(), level));
            }
        }

        img
    }

    pub fn save_image(
        &self,
        path: impl AsRef<Path>,
    ) -> std::result::Result<(), VisualizationError> {
        self.save_image_with(path, &VisualizationConfig::default())
    }

    pub fn save_image_with(
        &self,
        path: impl AsRef<Path>,
        config: &VisualizationConfig,
    ) -> std::result::Result<(), VisualizationError> {
        self.to_image_with(config).save(path)?;
        Ok(())
    }
}
