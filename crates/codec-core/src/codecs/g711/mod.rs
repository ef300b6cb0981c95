//! G.711 Audio Codec Implementation
//!
//! Stateless μ-law and A-law companding: one 16-bit sample to one octet at
//! 8 kHz, 64 kbit/s. Encoding runs the segment search in [`reference`];
//! decoding and the level metrics are single lookups in [`tables`].

pub mod reference;
pub mod tables;

#[cfg(test)]
mod tests;

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, Encoding, FormatDescriptor, Level, DEFAULT_LEVEL_WINDOW};
use crate::utils::validate_output_size;
use tracing::{debug, trace};

/// Companding law
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum G711Law {
    /// μ-law (North America, Japan)
    MuLaw,
    /// A-law (Europe, international)
    ALaw,
}

impl G711Law {
    /// Encoding tag for this law
    pub fn encoding(self) -> Encoding {
        match self {
            Self::MuLaw => Encoding::MuLaw,
            Self::ALaw => Encoding::ALaw,
        }
    }

    /// Compress one sample
    #[inline]
    pub fn compress(self, sample: i16) -> u8 {
        match self {
            Self::MuLaw => reference::ulaw_compress(sample),
            Self::ALaw => reference::alaw_compress(sample),
        }
    }

    /// Expand one octet
    #[inline]
    pub fn expand(self, code: u8) -> i16 {
        match self {
            Self::MuLaw => tables::ulaw_to_linear(code),
            Self::ALaw => tables::alaw_to_linear(code),
        }
    }

    /// Magnitude of one octet
    #[inline]
    pub fn level(self, code: u8) -> i16 {
        match self {
            Self::MuLaw => tables::ulaw_level(code),
            Self::ALaw => tables::alaw_level(code),
        }
    }
}

/// G.711 codec worker
///
/// # Example
/// ```
/// use voicecodec_core::codecs::g711::{G711Codec, G711Law};
/// use voicecodec_core::types::AudioCodec;
///
/// let mut codec = G711Codec::new(G711Law::MuLaw);
/// let (encoded, consumed) = codec.encode(&[0, 1000, -1000]);
/// assert_eq!(consumed, 3);
/// assert_eq!(encoded[0], 0xFF);
/// ```
#[derive(Debug, Clone)]
pub struct G711Codec {
    law: G711Law,
    info: FormatDescriptor,
}

impl G711Codec {
    /// Create a codec for the given law
    pub fn new(law: G711Law) -> Self {
        let info = FormatDescriptor::new(law.encoding());
        debug!("Created G.711 {} codec", info.annotation);
        Self { law, info }
    }

    /// Create a codec from an encoding tag
    pub fn from_encoding(encoding: Encoding) -> Result<Self> {
        match encoding {
            Encoding::MuLaw => Ok(Self::new(G711Law::MuLaw)),
            Encoding::ALaw => Ok(Self::new(G711Law::ALaw)),
            other => Err(CodecError::unsupported_encoding(other.name())),
        }
    }

    /// Companding law
    pub fn law(&self) -> G711Law {
        self.law
    }

    fn level_window<'a>(&self, data: &'a [u8], samples: usize) -> &'a [u8] {
        let samples = if samples == 0 {
            DEFAULT_LEVEL_WINDOW
        } else {
            samples
        };
        &data[..samples.min(data.len())]
    }
}

impl AudioCodec for G711Codec {
    fn info(&self) -> &FormatDescriptor {
        &self.info
    }

    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize> {
        validate_output_size(samples.len(), output.len())?;

        for (slot, &sample) in output.iter_mut().zip(samples) {
            *slot = self.law.compress(sample);
        }
        trace!("{}: encoded {} samples", self.info.annotation, samples.len());
        Ok(samples.len())
    }

    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> usize {
        let count = data.len().min(output.len());
        for (slot, &code) in output[..count].iter_mut().zip(data) {
            *slot = self.law.expand(code);
        }
        trace!("{}: decoded {} samples", self.info.annotation, count);
        count
    }

    fn reset(&mut self) {}

    /// Average magnitude by table lookup, without decoding
    ///
    /// A zero sample count selects a 160-sample window.
    fn impulse(&mut self, data: &[u8], samples: usize) -> Level {
        let window = self.level_window(data, samples);
        if window.is_empty() {
            return 0;
        }

        let sum: u64 = window
            .iter()
            .map(|&code| self.law.level(code) as u64)
            .sum();
        (sum / window.len() as u64) as Level
    }

    /// Peak magnitude by table lookup, without decoding
    fn peak(&mut self, data: &[u8], samples: usize) -> Level {
        self.level_window(data, samples)
            .iter()
            .map(|&code| self.law.level(code))
            .max()
            .unwrap_or(0)
    }
}
