//! Overlap-add accumulation of synthesis frames.

use crate::fft_backend::{Complex, FftNum};
use crate::window::Window;

/// Output signal built up from windowed inverse-transformed frames.
///
/// Each frame is scaled by `1 / (N * overlap_gain)`: `N` undoes the
/// unnormalized inverse transform and `overlap_gain` undoes the combined
/// analysis and synthesis windowing, so unmodified frames add back up to the
/// input.
#[derive(Debug, Clone)]
pub struct OverlapAddAccumulator<T> {
    output: Vec<T>,
    scale: T,
}

impl<T: FftNum> OverlapAddAccumulator<T> {
    pub fn new(output_len: usize, fft_size: usize, overlap_gain: T) -> Self {
        let denominator = T::from_f64_lossy(fft_size.max(1) as f64) * overlap_gain;
        let scale = if denominator > T::zero() {
            T::one() / denominator
        } else {
            T::one()
        };

        Self {
            output: vec![T::zero(); output_len],
            scale,
        }
    }

    /// Add the real part of `frame`, windowed and scaled, at `offset`.
    ///
    /// Samples that would land past the end of the output are dropped.
    pub fn accumulate(&mut self, offset: usize, frame: &[Complex<T>], window: &Window<T>) {
        if offset >= self.output.len() {
            return;
        }

        let scale = self.scale;
        let target = &mut self.output[offset..];
        for ((out, bin), &w) in target.iter_mut().zip(frame).zip(window.coefficients()) {
            *out = *out + bin.re * w * scale;
        }
    }

    pub fn scale(&self) -> T {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn output(&self) -> &[T] {
        &self.output
    }

    pub fn into_output(self) -> Vec<T> {
        self.output
    }
}
