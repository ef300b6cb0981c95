//! G.72x ADPCM Tables
//!
//! Quantizer, reconstruction and adaptation tables for the four supported
//! codeword widths, and the per-variant framing.

use crate::types::Encoding;

/// Powers of two used for the log-magnitude conversions
pub const POWER2: [i16; 15] = [
    1, 2, 4, 8, 0x10, 0x20, 0x40, 0x80, 0x100, 0x200, 0x400, 0x800, 0x1000, 0x2000, 0x4000,
];

/// One ADPCM variant: codeword width, framing and its tables
#[derive(Debug)]
pub struct G72xVariant {
    /// Encoding tag
    pub encoding: Encoding,
    /// Codeword width in bits
    pub bits: u32,
    /// Samples per batch
    pub batch: usize,
    /// Octets per batch
    pub octets: usize,
    /// Quantizer decision levels
    pub qtab: &'static [i16],
    /// Log-domain reconstruction levels, indexed by codeword
    pub dqln: &'static [i16],
    /// Scale factor multipliers, indexed by codeword
    pub wi: &'static [i32],
    /// Transition detector weights, indexed by codeword
    pub fi: &'static [i16],
    /// Magnitude mask applied to negative differences on reconstruction
    pub dq_mask: i16,
    /// Encoder halves the full signal estimate before narrowing it to 16 bits
    pub wide_encoder_estimate: bool,
}

impl G72xVariant {
    /// Sign bit of a codeword
    pub fn sign_bit(&self) -> u8 {
        1 << (self.bits - 1)
    }

    /// Mask covering one codeword
    pub fn code_mask(&self) -> u8 {
        ((1u16 << self.bits) - 1) as u8
    }

    /// Bitrate at 8 kHz
    pub fn bitrate(&self) -> u32 {
        8000 * self.bits
    }
}

/// G.721 32 kbit/s, 4-bit codewords
pub static G721: G72xVariant = G72xVariant {
    encoding: Encoding::G721Adpcm,
    bits: 4,
    batch: 2,
    octets: 1,
    qtab: &[-124, 80, 178, 246, 300, 349, 400],
    dqln: &[
        -2048, 4, 135, 213, 273, 323, 373, 425, 425, 373, 323, 273, 213, 135, 4, -2048,
    ],
    // Pre-scaled by 32; the top entry does not fit in an i16
    wi: &[
        -384, 576, 1312, 2048, 3584, 6336, 11360, 35904, 35904, 11360, 6336, 3584, 2048, 1312,
        576, -384,
    ],
    fi: &[
        0, 0, 0, 0x200, 0x200, 0x200, 0x600, 0xE00, 0xE00, 0x600, 0x200, 0x200, 0x200, 0, 0, 0,
    ],
    dq_mask: 0x3FFF,
    wide_encoder_estimate: true,
};

/// G.723 16 kbit/s, 2-bit codewords
pub static G723_16: G72xVariant = G72xVariant {
    encoding: Encoding::G723Adpcm16,
    bits: 2,
    batch: 4,
    octets: 1,
    qtab: &[261],
    dqln: &[116, 365, 365, 116],
    wi: &[-704, 14048, 14048, -704],
    fi: &[0, 0xE00, 0xE00, 0],
    dq_mask: 0x3FFF,
    wide_encoder_estimate: false,
};

/// G.723 24 kbit/s, 3-bit codewords
pub static G723_24: G72xVariant = G72xVariant {
    encoding: Encoding::G723Adpcm24,
    bits: 3,
    batch: 8,
    octets: 3,
    qtab: &[8, 218, 331],
    dqln: &[-2048, 135, 273, 373, 373, 273, 135, -2048],
    wi: &[-128, 960, 4384, 18624, 18624, 4384, 960, -128],
    fi: &[0, 0x200, 0x400, 0xE00, 0xE00, 0x400, 0x200, 0],
    dq_mask: 0x3FFF,
    wide_encoder_estimate: false,
};

/// G.723 40 kbit/s, 5-bit codewords
pub static G723_40: G72xVariant = G72xVariant {
    encoding: Encoding::G723Adpcm40,
    bits: 5,
    batch: 8,
    octets: 5,
    qtab: &[
        -122, -16, 68, 139, 198, 250, 298, 339, 378, 413, 445, 475, 502, 528, 553,
    ],
    dqln: &[
        -2048, -66, 28, 104, 169, 224, 274, 318, 358, 395, 429, 459, 488, 514, 539, 566, 566,
        539, 514, 488, 459, 429, 395, 358, 318, 274, 224, 169, 104, 28, -66, -2048,
    ],
    wi: &[
        448, 448, 768, 1248, 1280, 1312, 1856, 3200, 4512, 5728, 7008, 8960, 11456, 14080, 16928,
        22272, 22272, 16928, 14080, 11456, 8960, 7008, 5728, 4512, 3200, 1856, 1312, 1280, 1248,
        768, 448, 448,
    ],
    fi: &[
        0, 0, 0, 0, 0, 0x200, 0x200, 0x200, 0x200, 0x200, 0x400, 0x600, 0x800, 0xA00, 0xC00,
        0xC00, 0xC00, 0xC00, 0xA00, 0x800, 0x600, 0x400, 0x200, 0x200, 0x200, 0x200, 0x200, 0, 0,
        0, 0, 0,
    ],
    dq_mask: 0x7FFF,
    wide_encoder_estimate: false,
};

/// All variants, narrowest bitrate last
pub static VARIANTS: [&G72xVariant; 4] = [&G721, &G723_16, &G723_24, &G723_40];

/// Variant implementing `encoding`, if any
pub fn variant_for(encoding: Encoding) -> Option<&'static G72xVariant> {
    VARIANTS
        .iter()
        .copied()
        .find(|variant| variant.encoding == encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        for variant in VARIANTS {
            let codes = 1usize << variant.bits;
            assert_eq!(variant.dqln.len(), codes);
            assert_eq!(variant.wi.len(), codes);
            assert_eq!(variant.fi.len(), codes);
            assert_eq!(variant.qtab.len(), (codes >> 1) - 1);
            assert_eq!(variant.octets * 8, variant.batch * variant.bits as usize);
        }
    }

    #[test]
    fn test_tables_are_sign_symmetric() {
        for variant in VARIANTS {
            let n = variant.dqln.len();
            for i in 0..n / 2 {
                assert_eq!(variant.dqln[i], variant.dqln[n - 1 - i]);
                assert_eq!(variant.wi[i], variant.wi[n - 1 - i]);
                assert_eq!(variant.fi[i], variant.fi[n - 1 - i]);
            }
        }
    }

    #[test]
    fn test_variant_lookup() {
        assert_eq!(variant_for(Encoding::G723Adpcm24).map(|v| v.bits), Some(3));
        assert_eq!(G721.bitrate(), 32000);
        assert_eq!(G723_40.bitrate(), 40000);
        assert!(variant_for(Encoding::MuLaw).is_none());
    }
}
