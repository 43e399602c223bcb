use pvoc_rs::prelude::*;

#[test]
fn test_config_valid_factors() {
    let config = VocoderConfig::new(2.0, 0.5).expect("Config should be valid");
    assert_eq!(config.time_scaling_factor, 2.0);
    assert_eq!(config.pitch_shift_factor, 0.5);
    assert_eq!(config.pitch_mode, PitchMode::PhaseScaling);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_invalid_time_factor() {
    for value in [0.0, -0.5, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
        let config = VocoderConfig::new(value, 1.0);
        assert!(
            matches!(
                config,
                Err(VocoderError::InvalidParameter {
                    name: "time_scaling_factor",
                    ..
                })
            ),
            "{value} accepted"
        );
    }
}

#[test]
fn test_config_invalid_pitch_factor() {
    let config = VocoderConfig::new(1.0, 0.0);
    assert!(matches!(
        config,
        Err(VocoderError::InvalidParameter {
            name: "pitch_shift_factor",
            value
        }) if value == 0.0
    ));
}

#[test]
fn test_user_factors_are_inverted() {
    let config = VocoderConfig::from_user_factors(2.0, 2.0).unwrap();
    assert_eq!(config.time_scaling_factor, 0.5);
    assert_eq!(config.pitch_shift_factor, 0.5);

    let config = VocoderConfig::from_user_factors(0.25, 1.0).unwrap();
    assert_eq!(config.time_scaling_factor, 4.0);
    assert_eq!(config.pitch_shift_factor, 1.0);
}

#[test]
fn test_user_factors_validated_before_inversion() {
    assert!(matches!(
        VocoderConfig::from_user_factors(0.0, 1.0),
        Err(VocoderError::InvalidParameter {
            name: "time_stretch",
            ..
        })
    ));
    assert!(matches!(
        VocoderConfig::from_user_factors(1.0, f64::NAN),
        Err(VocoderError::InvalidParameter {
            name: "pitch_shift",
            ..
        })
    ));
}

#[test]
fn test_user_stretch_shortens_output() {
    let config = VocoderConfig::from_user_factors(2.0, 1.0).unwrap();
    assert_eq!(config.output_len(44100), 22050);
}

#[test]
fn test_fields_mutated_after_construction_are_revalidated() {
    let mut config = VocoderConfig::identity();
    config.pitch_shift_factor = -1.0;
    assert!(config.validate().is_err());

    let vocoder = PhaseVocoder::new(config);
    let input = AudioBuffer::new(vec![0.0f64; 4096], 44100);
    assert!(matches!(
        vocoder.process(&input),
        Err(VocoderError::InvalidParameter { .. })
    ));
}

#[test]
fn test_resample_mode_rejects_underflowing_product() {
    let config = VocoderConfig::new(1e-200, 1e-200)
        .unwrap()
        .with_pitch_mode(PitchMode::Resample);
    let vocoder = PhaseVocoder::new(config);
    let input = AudioBuffer::new(vec![0.0f64; 4096], 44100);
    assert!(matches!(
        vocoder.process(&input),
        Err(VocoderError::InvalidParameter { .. })
    ));
}

#[test]
fn test_config_display_in_errors() {
    let err = VocoderConfig::new(-2.0, 1.0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "time_scaling_factor must be a positive finite number, got -2"
    );
}
