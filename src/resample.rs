//! Linear-interpolation resampling, used to turn a time stretch into a pitch
//! shift.

use crate::fft_backend::FftNum;

/// Read `input` at positions `0, step, 2*step, ...`, interpolating linearly
/// between neighbouring samples, until `output_len` samples are produced.
///
/// `step > 1` raises the pitch, `step < 1` lowers it. Positions at or past
/// the last sample interpolate towards zero, so reading runs off the end
/// into silence.
pub fn resample_linear<T: FftNum>(input: &[T], step: f64, output_len: usize) -> Vec<T> {
    let sample_at = |index: usize| input.get(index).copied().unwrap_or_else(T::zero);

    (0..output_len)
        .map(|i| {
            let position = i as f64 * step;
            let index = position.floor() as usize;
            let frac = T::from_f64_lossy(position - index as f64);

            let a = sample_at(index);
            let b = sample_at(index + 1);
            a + (b - a) * frac
        })
        .collect()
}
