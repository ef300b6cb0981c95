//! Cross-module test suite for the codec library
//!
//! Per-codec behavior is tested next to each codec; this module covers the
//! paths that run through the registry, the descriptor and the buffers
//! together, and hosts the signal generators the other test modules share.

use crate::buffer::{EncodedBuffer, NativeAdapter, RingBuffer};
use crate::codecs::*;
use crate::types::*;

/// Common test utilities
pub mod utils {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// Sine tone of `len` samples
    pub fn generate_sine(frequency: f64, sample_rate: u32, len: usize, amplitude: f64) -> Vec<i16> {
        (0..len)
            .map(|k| {
                let phase = 2.0 * std::f64::consts::PI * frequency * k as f64 / sample_rate as f64;
                (amplitude * phase.sin()).clamp(-32768.0, 32767.0) as i16
            })
            .collect()
    }

    /// Uniform white noise in `-amplitude..=amplitude`, reproducible per seed
    pub fn generate_white_noise(len: usize, amplitude: i16, seed: u64) -> Vec<i16> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let amplitude = amplitude.unsigned_abs() as i32;
        (0..len)
            .map(|_| rng.gen_range(-amplitude..=amplitude) as i16)
            .collect()
    }

    /// Largest sample-wise absolute difference over the common prefix
    pub fn max_abs_error(a: &[i16], b: &[i16]) -> i32 {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| (x as i32 - y as i32).abs())
            .max()
            .unwrap_or(0)
    }
}

use utils::*;

#[test]
fn test_global_registry_builds_every_builtin() {
    let registry = CodecRegistry::global();

    for encoding in [
        Encoding::MuLaw,
        Encoding::ALaw,
        Encoding::G721Adpcm,
        Encoding::G723Adpcm16,
        Encoding::G723Adpcm24,
        Encoding::G723Adpcm40,
        Encoding::OkiAdpcm,
        Encoding::VoxAdpcm,
    ] {
        let mut worker = registry
            .lookup(encoding, None)
            .unwrap_or_else(|| panic!("no worker for {}", encoding));
        assert_eq!(worker.encoding(), encoding);
        assert!(worker.info().validate().is_ok(), "{}", worker.info());

        let tone = generate_sine(440.0, worker.info().rate, 480, 6000.0);
        let (encoded, consumed) = worker.encode(&tone);
        assert_eq!(consumed, 480, "{}", encoding);
        assert_eq!(encoded.len(), worker.info().to_bytes(480), "{}", encoding);

        let decoded = worker.decode(&encoded);
        assert_eq!(decoded.len(), 480, "{}", encoding);
    }

    assert!(registry.lookup(Encoding::GsmVoice, None).is_none());
}

#[test]
fn test_partial_batch_is_left_for_the_caller() {
    let mut codec = CodecFactory::create(Encoding::G723Adpcm40).unwrap();
    let tone = generate_sine(440.0, 8000, 21, 6000.0);

    let (encoded, consumed) = codec.encode(&tone);
    assert_eq!(consumed, 16);
    assert_eq!(encoded.len(), 10);

    // A trailing partial frame of encoded data is not decoded either
    let decoded = codec.decode(&encoded[..7]);
    assert_eq!(decoded.len(), 8);
}

#[test]
fn test_encode_to_buffer_reports_short_output() {
    let mut codec = CodecFactory::create(Encoding::G721Adpcm).unwrap();
    let tone = generate_sine(440.0, 8000, 160, 6000.0);

    let mut short = [0u8; 40];
    assert!(matches!(
        codec.encode_to_buffer(&tone, &mut short),
        Err(crate::CodecError::BufferTooSmall { needed: 80, actual: 40 })
    ));

    let mut output = [0u8; 80];
    assert_eq!(codec.encode_to_buffer(&tone, &mut output).unwrap(), 160);
}

#[test]
fn test_descriptor_json_round_trip() {
    let info = FormatDescriptor::new(Encoding::VoxAdpcm)
        .with_rate(8000)
        .with_annotation("vox/8000");

    let json = serde_json::to_string(&info).unwrap();
    let parsed: FormatDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, info);
    assert!(parsed.validate().is_ok());
}

#[test]
fn test_descriptor_json_defaults() {
    let json = r#"{"encoding":"mu-law","rate":8000,"bitrate":64000,"framesize":1,"framecount":1}"#;
    let parsed: FormatDescriptor = serde_json::from_str(json).unwrap();

    assert_eq!(parsed.encoding, Encoding::MuLaw);
    assert_eq!(parsed.layout, PcmLayout::Raw);
    assert_eq!(parsed.order, ByteOrder::native());

    let worker = CodecFactory::create_from_info(&parsed).unwrap();
    assert_eq!(worker.info().bitrate, 64000);
}

#[test]
fn test_create_from_info_rejects_inconsistent_descriptor() {
    let info = FormatDescriptor::new(Encoding::OkiAdpcm).with_bitrate(24000);
    assert!(matches!(
        CodecFactory::create_from_info(&info),
        Err(crate::CodecError::InvalidBitrate { bitrate: 24000, expected: 32000 })
    ));
}

#[test]
fn test_silence_detection_boundary() {
    let mut codec = CodecFactory::create(Encoding::MuLaw).unwrap();

    let (silence, _) = codec.encode(&[0i16; 160]);
    assert!(silence.iter().all(|&code| code == 0xFF));
    assert_eq!(codec.impulse(&silence, 0), 0);
    assert!(codec.is_silent(0, &silence, 0));

    let (tone, _) = codec.encode(&generate_sine(440.0, 8000, 160, 4000.0));
    let power = codec.impulse(&tone, 160);
    assert!(power > 2000, "power {}", power);
    assert!(codec.is_silent(power, &tone, 160));
    assert!(!codec.is_silent(power - 1, &tone, 160));
}

#[test]
fn test_adpcm_levels_follow_the_signal() {
    let mut codec = CodecFactory::create(Encoding::G721Adpcm).unwrap();
    let (loud, _) = codec.encode(&generate_sine(440.0, 8000, 800, 8000.0));

    let mut meter = CodecFactory::create(Encoding::G721Adpcm).unwrap();
    let peak = meter.peak(&loud, 800);
    assert!(peak > 6000 && peak < 10000, "peak {}", peak);

    let mut meter = CodecFactory::create(Encoding::G721Adpcm).unwrap();
    assert!(!meter.is_silent(100, &loud, 800));
}

#[test]
fn test_ring_buffer_pipeline_matches_direct_decode() {
    let tone = generate_sine(440.0, 8000, 1600, 8000.0);
    let mut encoder = CodecFactory::create(Encoding::G723Adpcm24).unwrap();
    let (encoded, _) = encoder.encode(&tone);

    let mut direct = CodecFactory::create(Encoding::G723Adpcm24).unwrap();
    let expected = direct.decode(&encoded);

    let info = encoder.info().clone();
    let ring = RingBuffer::with_duration(info, 100).unwrap();
    let mut streamed = CodecFactory::create(Encoding::G723Adpcm24).unwrap();
    let mut output = Vec::with_capacity(expected.len());

    // Producer writes 20 ms frames, consumer drains 60 octets at a time
    for chunk in encoded.chunks(60) {
        assert_eq!(ring.put(chunk), chunk.len());
        let octets = ring.get(chunk.len());
        output.extend(streamed.decode(&octets));
    }

    assert!(ring.is_empty());
    assert_eq!(output, expected);
}

#[test]
fn test_native_adapter_over_ring_buffer() {
    let info = FormatDescriptor::new(Encoding::Pcm16Mono).with_order(match ByteOrder::native() {
        ByteOrder::Little => ByteOrder::Big,
        ByteOrder::Big => ByteOrder::Little,
    });
    let adapter = NativeAdapter::new(RingBuffer::new(info, 64).unwrap());

    let samples: Vec<i16> = generate_sine(440.0, 8000, 16, 12000.0);
    let native: Vec<u8> = samples.iter().flat_map(|s| s.to_ne_bytes()).collect();
    assert_eq!(adapter.put_native(&native), native.len());

    // Stored in the descriptor's byte order
    let mut stored = [0u8; 4];
    assert_eq!(adapter.inner().get_buffer(&mut stored), 4);
    assert_eq!(stored[0], native[1]);
    assert_eq!(stored[1], native[0]);

    let mut rest = vec![0u8; native.len() - 4];
    assert_eq!(adapter.get_native(&mut rest), rest.len());
    assert_eq!(&rest[..], &native[4..]);
}

#[test]
fn test_registration_takes_precedence() {
    let registry = CodecRegistry::with_builtins();
    registry
        .register(std::sync::Arc::new(BuiltinPrototype::new(Encoding::GsmVoice, |_| {
            Err(crate::CodecError::external("gsm", "library not loaded"))
        })))
        .unwrap();

    // The prototype is found but cannot build, so the lookup fails softly
    assert!(registry.find(Encoding::GsmVoice).is_some());
    assert!(registry.lookup(Encoding::GsmVoice, None).is_none());
    assert_eq!(registry.len(), builtin_prototypes().len() + 1);
}
