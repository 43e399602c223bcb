#![cfg(feature = "wav")]

mod common;

use common::{SAMPLE_RATE, max_abs_error, sine};
use hound::{SampleFormat, WavSpec, WavWriter};
use pvoc_rs::prelude::*;
use pvoc_rs::wav::{WavError, read_wav, write_wav};

#[test]
fn test_wav_roundtrip_16bit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.wav");

    let original = AudioBuffer::new(sine(440.0, 4410), SAMPLE_RATE);
    write_wav(&path, &original).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, SampleFormat::Int);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    drop(reader);

    let decoded = read_wav::<f64, _>(&path).unwrap();
    assert_eq!(decoded.sample_rate, SAMPLE_RATE);
    assert_eq!(decoded.len(), original.len());

    let err = max_abs_error(&original.samples, &decoded.samples);
    assert!(err < 2.0 / 32768.0, "quantization error {err}");
}

#[test]
fn test_write_clamps_out_of_range_samples() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clipped.wav");

    let buffer = AudioBuffer::new(vec![1.5f32, -3.0, 0.5, f32::NAN], 8000);
    write_wav(&path, &buffer).unwrap();

    let raw: Vec<i16> = hound::WavReader::open(&path)
        .unwrap()
        .into_samples::<i16>()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(raw, vec![i16::MAX, -i16::MAX, 16384, 0]);
}

#[test]
fn test_stereo_input_is_averaged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo.wav");

    let spec = WavSpec {
        channels: 2,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for (l, r) in [(16384i16, 0i16), (-16384, -16384), (8192, -8192)] {
        writer.write_sample(l).unwrap();
        writer.write_sample(r).unwrap();
    }
    writer.finalize().unwrap();

    let mono = read_wav::<f64, _>(&path).unwrap();
    assert_eq!(mono.sample_rate, 22050);
    assert_eq!(mono.samples, vec![0.25, -0.5, 0.0]);
}

#[test]
fn test_24bit_and_float_input() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("24bit.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 24,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    writer.write_sample(1 << 22).unwrap();
    writer.write_sample(-(1 << 23)).unwrap();
    writer.finalize().unwrap();
    assert_eq!(read_wav::<f32, _>(&path).unwrap().samples, vec![0.5, -1.0]);

    let path = dir.path().join("float.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    writer.write_sample(0.25f32).unwrap();
    writer.write_sample(-0.75f32).unwrap();
    writer.finalize().unwrap();
    assert_eq!(read_wav::<f64, _>(&path).unwrap().samples, vec![0.25, -0.75]);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_wav::<f32, _>(dir.path().join("absent.wav"));
    assert!(matches!(result, Err(WavError::Hound(_))));
}

#[test]
fn test_file_to_file_stretch() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");

    write_wav(&input_path, &AudioBuffer::new(sine(440.0, 22050), SAMPLE_RATE)).unwrap();

    let input = read_wav::<f32, _>(&input_path).unwrap();
    let config = VocoderConfig::from_user_factors(0.5, 1.0).unwrap();
    let output = PhaseVocoder::new(config).process(&input).unwrap();
    write_wav(&output_path, &output).unwrap();

    let written = read_wav::<f32, _>(&output_path).unwrap();
    assert_eq!(written.len(), 44100);
    assert_eq!(written.sample_rate, SAMPLE_RATE);
}
