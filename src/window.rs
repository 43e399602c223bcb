//! Hann window shared by the analysis and synthesis stages.

use std::f64::consts::TAU;

use crate::fft_backend::{Complex, FftNum};

#[derive(Debug, Clone, PartialEq)]
pub struct Window<T> {
    coefficients: Vec<T>,
}

impl<T: FftNum> Window<T> {
    /// Symmetric Hann window: `w[i] = 0.5 * (1 - cos(2*pi*i / (size - 1)))`.
    ///
    /// Sizes below 2 have no taper and yield ones.
    pub fn hann(size: usize) -> Self {
        if size < 2 {
            return Self {
                coefficients: vec![T::one(); size],
            };
        }

        let denominator = (size - 1) as f64;
        let coefficients = (0..size)
            .map(|i| T::from_f64_lossy(0.5 * (1.0 - (TAU * i as f64 / denominator).cos())))
            .collect();

        Self { coefficients }
    }

    /// Arbitrary taper, e.g. all ones for a rectangular window.
    pub fn from_coefficients(coefficients: Vec<T>) -> Self {
        Self { coefficients }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Steady-state gain of analysis and synthesis windowing with frames `hop`
    /// samples apart: the sum of `w[i]^2` over overlapping frames, averaged
    /// over one hop period.
    pub fn overlap_gain(&self, hop: usize) -> T {
        if hop == 0 || self.coefficients.is_empty() {
            return T::one();
        }

        let mut period = vec![0.0f64; hop];
        for (i, &w) in self.coefficients.iter().enumerate() {
            let w = w.to_f64().unwrap_or(0.0);
            period[i % hop] += w * w;
        }
        let gain = period.iter().sum::<f64>() / hop as f64;

        if gain > 0.0 {
            T::from_f64_lossy(gain)
        } else {
            T::one()
        }
    }

    /// Window `signal[offset..offset + len]` into `frame` as real-valued bins.
    /// Samples past the end of `signal` read as zero.
    pub fn apply(&self, signal: &[T], offset: usize, frame: &mut [Complex<T>]) {
        debug_assert_eq!(frame.len(), self.len());

        let available = signal.len().saturating_sub(offset).min(frame.len());
        for (i, (bin, &w)) in frame.iter_mut().zip(&self.coefficients).enumerate() {
            let sample = if i < available {
                signal[offset + i]
            } else {
                T::zero()
            };
            *bin = Complex::new(sample * w, T::zero());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hann_endpoints_and_peak() {
        let window = Window::<f64>::hann(4096);
        assert_eq!(window.len(), 4096);

        let w = window.coefficients();
        assert!(w[0].abs() < 1e-12);
        assert!(w[4095].abs() < 1e-12);
        assert!(w.iter().all(|&x| (0.0..=1.0).contains(&x)));
        assert!((w[2048] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hann_is_symmetric() {
        let window = Window::<f32>::hann(1024);
        let w = window.coefficients();
        for i in 0..512 {
            assert_relative_eq!(w[i], w[1023 - i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(Window::<f64>::hann(0).is_empty());
        assert_eq!(Window::<f64>::hann(1).coefficients(), &[1.0]);
    }

    #[test]
    fn test_overlap_gain_at_quarter_hop() {
        let window = Window::<f64>::hann(4096);
        assert_relative_eq!(window.overlap_gain(1024), 1.5, epsilon = 1e-3);

        // Squared-window overlap is flat over the hop period
        let mut period = vec![0.0; 1024];
        for (i, &w) in window.coefficients().iter().enumerate() {
            period[i % 1024] += w * w;
        }
        let min = period.iter().copied().fold(f64::INFINITY, f64::min);
        let max = period.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!((max - min) / max < 1e-2, "ripple {}", (max - min) / max);
    }

    #[test]
    fn test_apply_zero_pads_past_end() {
        let window = Window::<f64>::hann(8);
        let signal = vec![1.0; 10];
        let mut frame = vec![Complex::new(9.0, 9.0); 8];

        window.apply(&signal, 6, &mut frame);

        for (i, bin) in frame.iter().enumerate() {
            let expected = if i < 4 { window.coefficients()[i] } else { 0.0 };
            assert_relative_eq!(bin.re, expected);
            assert_eq!(bin.im, 0.0);
        }

        window.apply(&signal, 20, &mut frame);
        assert!(frame.iter().all(|bin| bin.re == 0.0 && bin.im == 0.0));
    }
}
