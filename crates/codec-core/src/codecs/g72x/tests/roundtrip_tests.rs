//! G.72x round-trip tests
//!
//! Encode a tone, decode it with an independent worker, and bound the error
//! once the predictor has converged.

use crate::codecs::g72x::G72xCodec;
use crate::tests::utils::{generate_sine, generate_white_noise, max_abs_error};
use crate::types::{AudioCodec, Encoding};

/// Samples skipped before measuring, while the predictor adapts
const WARMUP: usize = 200;

fn round_trip(encoding: Encoding, input: &[i16]) -> Vec<i16> {
    let mut encoder = G72xCodec::new(encoding).unwrap();
    let mut decoder = G72xCodec::new(encoding).unwrap();

    let (encoded, consumed) = encoder.encode(input);
    assert_eq!(consumed, input.len());
    decoder.decode(&encoded)
}

#[test]
fn test_tone_round_trip_error_bounds() {
    let tone = generate_sine(440.0, 8000, 800, 8000.0);

    for (encoding, bound) in [
        (Encoding::G723Adpcm16, 3000),
        (Encoding::G723Adpcm24, 1000),
        (Encoding::G721Adpcm, 500),
        (Encoding::G723Adpcm40, 300),
    ] {
        let decoded = round_trip(encoding, &tone);
        assert_eq!(decoded.len(), tone.len());

        let error = max_abs_error(&tone[WARMUP..], &decoded[WARMUP..]);
        assert!(error < bound, "{}: max error {} exceeds {}", encoding, error, bound);
    }
}

#[test]
fn test_wider_codewords_track_better() {
    let tone = generate_sine(440.0, 8000, 800, 8000.0);

    let errors: Vec<i32> = [
        Encoding::G723Adpcm16,
        Encoding::G723Adpcm24,
        Encoding::G721Adpcm,
        Encoding::G723Adpcm40,
    ]
    .into_iter()
    .map(|encoding| {
        let decoded = round_trip(encoding, &tone);
        max_abs_error(&tone[WARMUP..], &decoded[WARMUP..])
    })
    .collect();

    for pair in errors.windows(2) {
        assert!(pair[1] < pair[0], "errors should shrink with width: {:?}", errors);
    }
}

#[test]
fn test_decoder_matches_encoder_reconstruction() {
    // A decoder fed the encoder's codewords ends in the encoder's state
    let noise = generate_white_noise(1600, 6000, 7);

    for encoding in [
        Encoding::G721Adpcm,
        Encoding::G723Adpcm16,
        Encoding::G723Adpcm24,
        Encoding::G723Adpcm40,
    ] {
        let mut encoder = G72xCodec::new(encoding).unwrap();
        let mut decoder = G72xCodec::new(encoding).unwrap();

        let (encoded, _) = encoder.encode(&noise);
        decoder.decode(&encoded);
        assert_eq!(encoder.encoder_state(), decoder.decoder_state(), "{}", encoding);
    }
}

#[test]
fn test_reset_restores_initial_output() {
    let tone = generate_sine(1000.0, 8000, 160, 6000.0);
    let mut codec = G72xCodec::new(Encoding::G721Adpcm).unwrap();

    let (first, _) = codec.encode(&tone);
    let (second, _) = codec.encode(&tone);
    codec.reset();
    let (third, _) = codec.encode(&tone);

    assert_eq!(first, third);
    assert_ne!(first, second);
}

#[test]
fn test_zero_stream_stays_bounded() {
    for encoding in [
        Encoding::G721Adpcm,
        Encoding::G723Adpcm16,
        Encoding::G723Adpcm24,
        Encoding::G723Adpcm40,
    ] {
        let mut codec = G72xCodec::new(encoding).unwrap();
        let (encoded, _) = codec.encode(&[0i16; 4000]);

        let state = codec.encoder_state();
        assert!((544..=5120).contains(&state.yu), "{}: yu {}", encoding, state.yu);

        let decoded = codec.decode(&encoded);
        assert_eq!(decoded.len(), 4000);
    }
}
