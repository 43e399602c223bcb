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

//! Frequency transform abstraction
//!
//! The vocoder needs one thing from an FFT library: a fixed-length complex
//! transform in both directions. This module hides the provider behind two
//! traits:
//! - [`TransformBackend`] plans a transform of a given length,
//! - [`FrequencyTransform`] runs it in place.
//!
//! Providers:
//! - `rustfft`: any length, `f32` and `f64` (always available)
//! - `microfft`: `f32` only, length 4096 only (`microfft-backend` feature)
//!
//! Neither direction normalizes, so `inverse(forward(x)) == N * x`.

use std::fmt;
use std::sync::Arc;

use num_traits::{Float, FromPrimitive};
use rustfft::{Fft, FftPlanner};

use crate::{Result, VocoderError};

pub use rustfft::num_complex::Complex;

/// Sample type accepted by the vocoder: `f32` or `f64`.
pub trait FftNum: Float + FromPrimitive + fmt::Debug + fmt::Display + rustfft::FftNum {
    /// Convert an `f64` constant into this type, rounding if needed.
    fn from_f64_lossy(value: f64) -> Self;
}

impl FftNum for f32 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }
}

impl FftNum for f64 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
}

/// Fixed-length complex transform, processed in place.
///
/// A planned transform owns whatever plans and scratch memory it needs; they
/// are released when the value is dropped.
pub trait FrequencyTransform<T: FftNum> {
    /// Forward transform of `buffer` (length must equal [`len`](Self::len)).
    fn forward(&mut self, buffer: &mut [Complex<T>]);

    /// Unnormalized inverse transform of `buffer`.
    fn inverse(&mut self, buffer: &mut [Complex<T>]);

    /// Transform length
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Factory for [`FrequencyTransform`] instances.
pub trait TransformBackend<T: FftNum> {
    type Transform: FrequencyTransform<T>;

    /// Short provider name used in errors and logs
    fn name(&self) -> &'static str;

    /// Acquire a transform of `size` bins.
    fn plan(&self, size: usize) -> Result<Self::Transform>;
}

// ============================================================================
// RustFFT provider
// ============================================================================

/// Plans transforms with `rustfft`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustFftBackend;

/// Forward and inverse `rustfft` plans sharing one scratch buffer.
pub struct RustFftTransform<T: FftNum> {
    forward: Arc<dyn Fft<T>>,
    inverse: Arc<dyn Fft<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: FftNum> TransformBackend<T> for RustFftBackend {
    type Transform = RustFftTransform<T>;

    fn name(&self) -> &'static str {
        "rustfft"
    }

    fn plan(&self, size: usize) -> Result<Self::Transform> {
        if size == 0 {
            return Err(VocoderError::UnsupportedTransformSize {
                backend: TransformBackend::<T>::name(self),
                size,
            });
        }

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(RustFftTransform {
            forward,
            inverse,
            scratch: vec![Complex::new(T::zero(), T::zero()); scratch_len],
        })
    }
}

impl<T: FftNum> FrequencyTransform<T> for RustFftTransform<T> {
    fn forward(&mut self, buffer: &mut [Complex<T>]) {
        debug_assert_eq!(buffer.len(), self.len());
        self.forward.process_with_scratch(buffer, &mut self.scratch);
    }

    fn inverse(&mut self, buffer: &mut [Complex<T>]) {
        debug_assert_eq!(buffer.len(), self.len());
        self.inverse.process_with_scratch(buffer, &mut self.scratch);
    }

    fn len(&self) -> usize {
        self.forward.len()
    }
}

impl<T: FftNum> fmt::Debug for RustFftTransform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RustFftTransform")
            .field("len", &self.forward.len())
            .field("scratch_len", &self.scratch.len())
            .finish()
    }
}

// ============================================================================
// MicroFFT provider
// ============================================================================

#[cfg(feature = "microfft-backend")]
mod microfft_impl {
    use super::*;

    /// The only length compiled into this provider
    pub const MICROFFT_SIZE: usize = 4096;

    /// Plans `f32` transforms of length 4096 with `microfft`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct MicroFftBackend;

    /// Stateless: microfft works on fixed-size arrays with no plan or scratch.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct MicroFftTransform;

    fn cfft(buffer: &mut [Complex<f32>]) {
        let Ok(frame) = <&mut [Complex<f32>; MICROFFT_SIZE]>::try_from(buffer) else {
            panic!("microfft transform expects exactly {MICROFFT_SIZE} bins");
        };
        let _ = microfft::complex::cfft_4096(frame);
    }

    impl TransformBackend<f32> for MicroFftBackend {
        type Transform = MicroFftTransform;

        fn name(&self) -> &'static str {
            "microfft"
        }

        fn plan(&self, size: usize) -> Result<Self::Transform> {
            if size != MICROFFT_SIZE {
                return Err(VocoderError::UnsupportedTransformSize {
                    backend: self.name(),
                    size,
                });
            }
            Ok(MicroFftTransform)
        }
    }

    impl FrequencyTransform<f32> for MicroFftTransform {
        fn forward(&mut self, buffer: &mut [Complex<f32>]) {
            cfft(buffer);
        }

        fn inverse(&mut self, buffer: &mut [Complex<f32>]) {
            // IFFT(x) = conj(FFT(conj(x))), unscaled
            for value in buffer.iter_mut() {
                *value = value.conj();
            }
            cfft(buffer);
            for value in buffer.iter_mut() {
                *value = value.conj();
            }
        }

        fn len(&self) -> usize {
            MICROFFT_SIZE
        }
    }
}

#[cfg(feature = "microfft-backend")]
pub use microfft_impl::{MICROFFT_SIZE, MicroFftBackend, MicroFftTransform};
