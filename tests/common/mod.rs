/// Common test utilities
use pvoc_rs::fft_backend::RustFftTransform;
use pvoc_rs::{
    ANALYSIS_HOP, Complex, FFT_SIZE, FrequencyTransform, RustFftBackend, TransformBackend, Window,
};

pub const SAMPLE_RATE: u32 = 44100;

/// `len` samples of a 0.5-amplitude sine at `freq` Hz.
#[allow(dead_code)]
pub fn sine(freq: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 0.5 * (std::f64::consts::TAU * freq * i as f64 / SAMPLE_RATE as f64).sin())
        .collect()
}

/// Output samples of an identity run covered by four overlapping frames.
#[allow(dead_code)]
pub fn full_overlap_range(len: usize) -> std::ops::Range<usize> {
    3 * ANALYSIS_HOP..(len / ANALYSIS_HOP - 1) * ANALYSIS_HOP
}

#[allow(dead_code)]
pub fn calculate_snr(original: &[f64], reconstructed: &[f64]) -> f64 {
    assert_eq!(original.len(), reconstructed.len());

    let signal_power: f64 = original.iter().map(|x| x.powi(2)).sum();
    let noise_power: f64 = original
        .iter()
        .zip(reconstructed.iter())
        .map(|(o, r)| (o - r).powi(2))
        .sum();

    if noise_power == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (signal_power / noise_power).log10()
    }
}

#[allow(dead_code)]
pub fn max_abs_error(original: &[f64], reconstructed: &[f64]) -> f64 {
    original
        .iter()
        .zip(reconstructed.iter())
        .map(|(o, r)| (o - r).abs())
        .max_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap_or(0.0)
}

#[allow(dead_code)]
pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

/// Strongest bin below Nyquist of a Hann-windowed `FFT_SIZE` frame taken
/// from the middle of `signal`.
#[allow(dead_code)]
pub fn dominant_bin(signal: &[f64]) -> usize {
    let start = (signal.len() / 2).saturating_sub(FFT_SIZE / 2);
    let window = Window::<f64>::hann(FFT_SIZE);
    let mut transform: RustFftTransform<f64> = RustFftBackend.plan(FFT_SIZE).unwrap();
    let mut frame = vec![Complex::new(0.0, 0.0); FFT_SIZE];

    window.apply(signal, start, &mut frame);
    transform.forward(&mut frame);

    (1..FFT_SIZE / 2)
        .max_by(|&a, &b| frame[a].norm().partial_cmp(&frame[b].norm()).unwrap())
        .unwrap()
}

/// Bin nearest to `freq` Hz.
#[allow(dead_code)]
pub fn bin_of(freq: f64) -> usize {
    (freq * FFT_SIZE as f64 / SAMPLE_RATE as f64).round() as usize
}
