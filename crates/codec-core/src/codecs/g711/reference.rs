//! G.711 Reference Conversions
//!
//! Per-sample mu-law and a-law compression by segment search, and the
//! closed-form expansions the decode tables are generated from.
//!
//! ## Algorithm Details
//!
//! ### μ-law Compression
//! - Takes the magnitude, clips it and adds a bias of 0x84
//! - Finds the segment with an 8-step ladder over 16-bit segment ends
//! - Packs sign, segment and 4-bit mantissa and inverts every bit
//!
//! ### A-law Compression
//! - Takes the magnitude; positive samples carry the sign bit in the mask
//! - Finds the segment with the same 8-step ladder
//! - Toggles even bits (XOR with 0x55)

/// Upper bound (inclusive) of each segment, for 16-bit magnitudes
pub const SEG_END: [i32; 8] = [0xFF, 0x1FF, 0x3FF, 0x7FF, 0xFFF, 0x1FFF, 0x3FFF, 0x7FFF];

/// μ-law bias added before the segment search
pub const ULAW_BIAS: i32 = 0x84;

/// Largest magnitude that still fits a 16-bit sample after biasing
pub const ULAW_CLIP: i32 = 32635;

/// Alternate mark inversion mask applied to every a-law octet
pub const AMI_MASK: u8 = 0x55;

/// Index of the first segment whose end is at or above `magnitude`, or 8
pub fn segment(magnitude: i32) -> usize {
    SEG_END
        .iter()
        .position(|&end| magnitude <= end)
        .unwrap_or(SEG_END.len())
}

/// μ-law compression
///
/// Compresses a 16-bit linear PCM sample to an 8-bit μ-law octet. Zero input
/// yields 0xFF.
pub fn ulaw_compress(sample: i16) -> u8 {
    let mut magnitude = sample as i32;
    let sign = if magnitude < 0 {
        magnitude = -magnitude;
        0x80
    } else {
        0
    };

    let biased = magnitude.min(ULAW_CLIP) + ULAW_BIAS;
    let exponent = segment(biased) as i32;
    let mantissa = (biased >> (exponent + 3)) & 0x0F;

    !((sign | (exponent << 4) | mantissa) as u8)
}

/// μ-law expansion
///
/// Expands an 8-bit μ-law octet to 16-bit linear PCM.
pub fn ulaw_expand(compressed: u8) -> i16 {
    let sign = if compressed < 0x0080 { -1 } else { 1 };
    let mantissa = (!compressed) as i16;
    let exponent = (mantissa >> 4) & 0x0007;
    let segment = exponent + 1;
    let mantissa = mantissa & 0x000F;

    let step = 4 << segment;

    sign * ((0x0080 << exponent) + step * mantissa + step / 2 - 4 * 33)
}

/// A-law compression
///
/// Compresses a 16-bit linear PCM sample to an 8-bit A-law octet.
pub fn alaw_compress(sample: i16) -> u8 {
    let mut magnitude = sample as i32;
    let mask = if magnitude >= 0 {
        AMI_MASK | 0x80
    } else {
        magnitude = -magnitude;
        AMI_MASK
    };

    let seg = segment(magnitude);
    // Only -32768 falls past the last segment
    if seg >= SEG_END.len() {
        return 0x7F ^ mask;
    }

    let shift = if seg == 0 { 4 } else { seg + 3 };
    let code = ((seg as i32) << 4) | ((magnitude >> shift) & 0x0F);
    code as u8 ^ mask
}

/// A-law expansion
///
/// Expands an 8-bit A-law octet to 16-bit linear PCM.
pub fn alaw_expand(compressed: u8) -> i16 {
    let mut ix = (compressed ^ AMI_MASK) as i16;

    ix &= 0x007F;
    let iexp = ix >> 4;
    let mut mant = ix & 0x000F;

    if iexp > 0 {
        mant += 16;
    }

    mant = (mant << 4) + 0x0008;

    if iexp > 1 {
        mant <<= iexp - 1;
    }

    if compressed > 127 {
        mant
    } else {
        -mant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_ladder() {
        assert_eq!(segment(0), 0);
        assert_eq!(segment(0xFF), 0);
        assert_eq!(segment(0x100), 1);
        assert_eq!(segment(0x7FFF), 7);
        assert_eq!(segment(0x8000), 8);
    }

    #[test]
    fn test_ulaw_zero() {
        assert_eq!(ulaw_compress(0), 0xFF);
        assert_eq!(ulaw_expand(0xFF), 0);
        assert_eq!(ulaw_expand(0x7F), 0);
    }

    #[test]
    fn test_ulaw_extremes_do_not_overflow() {
        assert_eq!(ulaw_compress(i16::MAX), 0x80);
        assert_eq!(ulaw_compress(i16::MIN), 0x00);
        assert_eq!(ulaw_expand(0x80), 32124);
        assert_eq!(ulaw_expand(0x00), -32124);
    }

    #[test]
    fn test_alaw_extremes() {
        assert_eq!(alaw_compress(i16::MIN), 0x2A);
        assert_eq!(alaw_expand(0x2A), -32256);
        assert_eq!(alaw_compress(i16::MAX), 0xAA);
        assert_eq!(alaw_expand(0xAA), 32256);
        assert_eq!(alaw_expand(0x00), -5504);
        assert_eq!(alaw_expand(0x80), 5504);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(alaw_compress(8), 0xD5);
        assert_eq!(alaw_compress(-8), 0x55);
        assert_eq!(ulaw_expand(0x81), 31100);
        assert_eq!(alaw_expand(0x81), 5248);
    }

    #[test]
    fn test_basic_round_trip() {
        for sample in [0i16, 100, -100, 1000, -1000, 10000, -10000] {
            let ulaw = ulaw_expand(ulaw_compress(sample));
            let alaw = alaw_expand(alaw_compress(sample));
            let tolerance = (sample as i32).abs() / 16 + 16;
            assert!((ulaw as i32 - sample as i32).abs() <= tolerance, "mu-law {}", sample);
            assert!((alaw as i32 - sample as i32).abs() <= tolerance, "a-law {}", sample);
        }
    }
}
