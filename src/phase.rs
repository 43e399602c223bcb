//! Per-bin phase tracking across analysis frames.
//!
//! For every bin the tracker measures how far the observed phase drifted from
//! the advance a tone centred on that bin would make over one hop. The
//! wrapped drift refines the bin's centre frequency into an instantaneous
//! frequency, which is then integrated (scaled by the pitch factor) into the
//! synthesis phase.
//!
//! Frame `f` depends on the state left by frame `f - 1`, so frames have to be
//! fed in order, one at a time.

use std::f64::consts::{PI, TAU};

use crate::fft_backend::{Complex, FftNum};

/// Wrap `phase` into the principal range (-pi, pi].
#[inline]
pub fn wrap_phase<T: FftNum>(phase: T) -> T {
    let pi = T::from_f64_lossy(PI);
    let tau = T::from_f64_lossy(TAU);

    let wrapped = phase - tau * (phase / tau).round();
    if wrapped <= -pi {
        wrapped + tau
    } else if wrapped > pi {
        wrapped - tau
    } else {
        wrapped
    }
}

#[derive(Debug, Clone)]
pub struct PhaseTracker<T> {
    hop: usize,
    pitch_shift: T,
    /// 2*pi*k/N
    bin_frequency: Vec<T>,
    /// 2*pi*k*hop/N, reduced to (-pi, pi]
    expected_advance: Vec<T>,
    /// hop * 2*pi*k/N * pitch_shift, reduced to (-pi, pi]
    scaled_advance: Vec<T>,
    prev_phase: Vec<T>,
    synth_phase: Vec<T>,
    deviations: Vec<T>,
    frames_processed: usize,
}

impl<T: FftNum> PhaseTracker<T> {
    /// Zeroed state for `size` bins, frames `hop` samples apart.
    ///
    /// The per-bin advances are reduced modulo 2*pi in `f64` here, once, so
    /// the per-frame accumulation stays small. Only `cos`/`sin` of the
    /// synthesis phase are ever observed, so the reduction changes nothing.
    pub fn new(size: usize, hop: usize, pitch_shift: f64) -> Self {
        let n = size.max(1) as f64;
        let hop_f = hop as f64;

        let mut bin_frequency = Vec::with_capacity(size);
        let mut expected_advance = Vec::with_capacity(size);
        let mut scaled_advance = Vec::with_capacity(size);
        for k in 0..size {
            let omega = TAU * k as f64 / n;
            bin_frequency.push(T::from_f64_lossy(omega));
            expected_advance.push(T::from_f64_lossy(wrap_phase(omega * hop_f)));
            scaled_advance.push(T::from_f64_lossy(wrap_phase(omega * hop_f * pitch_shift)));
        }

        Self {
            hop,
            pitch_shift: T::from_f64_lossy(pitch_shift),
            bin_frequency,
            expected_advance,
            scaled_advance,
            prev_phase: vec![T::zero(); size],
            synth_phase: vec![T::zero(); size],
            deviations: vec![T::zero(); size],
            frames_processed: 0,
        }
    }

    /// Replace every bin of `spectrum` by its magnitude at the accumulated
    /// synthesis phase, updating the tracked state.
    ///
    /// # Panics
    ///
    /// Panics if `spectrum.len()` differs from the tracker's bin count.
    pub fn process(&mut self, spectrum: &mut [Complex<T>]) {
        assert_eq!(spectrum.len(), self.len(), "Frequency bins mismatch");

        for (k, bin) in spectrum.iter_mut().enumerate() {
            let magnitude = bin.norm();
            let phase = bin.arg();

            let deviation = wrap_phase(phase - self.prev_phase[k] - self.expected_advance[k]);
            self.prev_phase[k] = phase;
            self.deviations[k] = deviation;

            // hop * true_freq * pitch, true_freq = 2*pi*k/N + deviation/hop
            let increment = self.scaled_advance[k] + deviation * self.pitch_shift;
            self.synth_phase[k] = wrap_phase(self.synth_phase[k] + increment);

            *bin = Complex::from_polar(magnitude, self.synth_phase[k]);
        }

        self.frames_processed += 1;
    }

    /// Instantaneous frequency of bin `k` from the last frame, in radians per sample.
    pub fn true_frequency(&self, k: usize) -> T {
        let hop = T::from_f64_lossy(self.hop.max(1) as f64);
        self.bin_frequency[k] + self.deviations[k] / hop
    }

    /// Wrapped phase drift of every bin from the last frame
    pub fn deviations(&self) -> &[T] {
        &self.deviations
    }

    pub fn prev_phase(&self) -> &[T] {
        &self.prev_phase
    }

    pub fn synth_phase(&self) -> &[T] {
        &self.synth_phase
    }

    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    pub fn len(&self) -> usize {
        self.prev_phase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prev_phase.is_empty()
    }
}
