use pvoc_rs::prelude::*;
use pvoc_rs::{ANALYSIS_HOP, FFT_SIZE};

fn dominant_frequency(samples: &[f32], sample_rate: u32) -> f32 {
    // Zero crossings per second, halved
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
        .count();
    crossings as f32 * sample_rate as f32 / (2.0 * samples.len() as f32)
}

fn main() -> Result<(), VocoderError> {
    println!("Phase vocoder:");
    println!("  FFT size: {}", FFT_SIZE);
    println!("  Analysis hop: {}", ANALYSIS_HOP);
    println!();

    let sample_rate = 44100;
    let duration_secs = 1.0;
    let num_samples = (sample_rate as f32 * duration_secs) as usize;

    let audio: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
        })
        .collect();
    let input = AudioBuffer::new(audio, sample_rate);

    println!(
        "Input: {} samples ({:.2} s), ~{:.0} Hz",
        input.len(),
        input.duration_secs(),
        dominant_frequency(&input.samples, sample_rate)
    );

    let cases = [
        ("stretch x2", VocoderConfig::new(2.0, 1.0)?),
        ("compress x0.5", VocoderConfig::new(0.5, 1.0)?),
        (
            "octave up (resample)",
            VocoderConfig::new(1.0, 2.0)?.with_pitch_mode(PitchMode::Resample),
        ),
        ("pitch x2 (phase scaling)", VocoderConfig::new(1.0, 2.0)?),
    ];

    for (label, config) in cases {
        let output = PhaseVocoder::new(config).process(&input)?;
        let interior = &output.samples[FFT_SIZE..output.len() - FFT_SIZE];
        println!(
            "{:<26} {} samples ({:.2} s), ~{:.0} Hz",
            label,
            output.len(),
            output.duration_secs(),
            dominant_frequency(interior, sample_rate)
        );
    }

    Ok(())
}
