//! G.711 codec tests

use crate::codecs::g711::{G711Codec, G711Law};
use crate::tests::utils::generate_sine;
use crate::types::{AudioCodec, Encoding};

#[test]
fn test_descriptors() {
    for (law, encoding, annotation) in [
        (G711Law::MuLaw, Encoding::MuLaw, "mu-law"),
        (G711Law::ALaw, Encoding::ALaw, "a-law"),
    ] {
        let codec = G711Codec::new(law);
        let info = codec.info();
        assert_eq!(info.encoding, encoding);
        assert_eq!(info.annotation, annotation);
        assert_eq!((info.rate, info.bitrate), (8000, 64000));
        assert_eq!((info.framesize, info.framecount), (1, 1));
    }

    assert!(G711Codec::from_encoding(Encoding::G721Adpcm).is_err());
}

#[test]
fn test_zero_sample() {
    let mut codec = G711Codec::new(G711Law::MuLaw);
    let (encoded, _) = codec.encode(&[0]);
    assert_eq!(encoded, vec![0xFF]);
    assert_eq!(codec.decode(&encoded), vec![0]);
}

#[test]
fn test_second_pass_is_idempotent() {
    let signal = generate_sine(440.0, 8000, 480, 20000.0);

    for law in [G711Law::MuLaw, G711Law::ALaw] {
        let mut codec = G711Codec::new(law);
        let (encoded, _) = codec.encode(&signal);
        let first = codec.decode(&encoded);
        let (encoded, _) = codec.encode(&first);
        let second = codec.decode(&encoded);
        assert_eq!(first, second, "{:?}", law);
    }
}

#[test]
fn test_level_metrics_use_magnitude_tables() {
    let mut codec = G711Codec::new(G711Law::MuLaw);

    // Codes 0x00 and 0x80 are the extremes of either sign
    let data = [0x00u8, 0x80, 0xFF, 0x7F];
    assert_eq!(codec.peak(&data, 4), 32124);
    assert_eq!(codec.impulse(&data, 4), (32124 * 2 / 4) as i16);

    // Default window is clamped to the data supplied
    assert_eq!(codec.impulse(&data, 0), (32124 * 2 / 4) as i16);
    assert_eq!(codec.impulse(&[], 0), 0);
}

#[test]
fn test_table_levels_agree_with_decoding() {
    let signal = generate_sine(300.0, 8000, 160, 12000.0);

    for law in [G711Law::ALaw, G711Law::MuLaw] {
        let mut codec = G711Codec::new(law);
        let (encoded, _) = codec.encode(&signal);

        let decoded = codec.decode(&encoded);
        let expected_peak = decoded.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
        assert_eq!(codec.peak(&encoded, 160) as u16, expected_peak);
    }
}

#[test]
fn test_is_silent_boundary() {
    let mut codec = G711Codec::new(G711Law::ALaw);
    let (encoded, _) = codec.encode(&[1000i16; 160]);
    let power = codec.impulse(&encoded, 160);

    assert!(codec.is_silent(power, &encoded, 160));
    assert!(!codec.is_silent(power - 1, &encoded, 160));
}
