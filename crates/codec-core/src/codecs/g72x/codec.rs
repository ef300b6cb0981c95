//! G.72x ADPCM Codec Implementation
//!
//! One codec type serves all four widths; the variant selects tables and
//! framing.

use super::adpcm;
use super::packing::{CodewordReader, CodewordWriter};
use super::state::AdpcmState;
use super::tables::{self, G72xVariant};
use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, Encoding, FormatDescriptor};
use crate::utils::validate_output_size;
use tracing::{debug, trace};

/// G.721 / G.723 ADPCM codec worker
///
/// Encoder and decoder states are independent, so one worker can encode one
/// direction of a call while decoding the other.
///
/// # Example
/// ```
/// use voicecodec_core::codecs::g72x::G72xCodec;
/// use voicecodec_core::types::{AudioCodec, Encoding};
///
/// let mut codec = G72xCodec::new(Encoding::G723Adpcm24).unwrap();
///
/// // 3 octets per 8 samples
/// let (encoded, consumed) = codec.encode(&[0i16; 20]);
/// assert_eq!(consumed, 16);
/// assert_eq!(encoded.len(), 6);
///
/// let decoded = codec.decode(&encoded);
/// assert_eq!(decoded.len(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct G72xCodec {
    variant: &'static G72xVariant,
    info: FormatDescriptor,
    encoder: AdpcmState,
    decoder: AdpcmState,
}

impl G72xCodec {
    /// Create a worker for an ADPCM encoding
    pub fn new(encoding: Encoding) -> Result<Self> {
        let variant = tables::variant_for(encoding)
            .ok_or_else(|| CodecError::unsupported_encoding(encoding.name()))?;
        Ok(Self::with_variant(variant))
    }

    /// Create a worker for a specific variant
    pub fn with_variant(variant: &'static G72xVariant) -> Self {
        let info = FormatDescriptor::new(variant.encoding)
            .with_framing(variant.octets, variant.batch);

        debug!(
            "Created {} codec: {} bits/sample, {} samples per {} octets",
            info.annotation, variant.bits, variant.batch, variant.octets
        );

        Self {
            variant,
            info,
            encoder: AdpcmState::new(),
            decoder: AdpcmState::new(),
        }
    }

    /// Variant tables and framing
    pub fn variant(&self) -> &'static G72xVariant {
        self.variant
    }

    /// Encoder adaptive state
    pub fn encoder_state(&self) -> &AdpcmState {
        &self.encoder
    }

    /// Decoder adaptive state
    pub fn decoder_state(&self) -> &AdpcmState {
        &self.decoder
    }
}

impl AudioCodec for G72xCodec {
    fn info(&self) -> &FormatDescriptor {
        &self.info
    }

    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize> {
        let count = self.info.align_samples(samples.len());
        let needed = self.info.to_bytes(count);
        validate_output_size(needed, output.len())?;

        let mut writer = CodewordWriter::new(&mut output[..needed], self.variant.bits);
        for &sample in &samples[..count] {
            writer.push(adpcm::encode_sample(sample, &mut self.encoder, self.variant));
        }
        writer.finish();

        trace!("{}: encoded {} samples into {} octets", self.info.annotation, count, needed);
        Ok(count)
    }

    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> usize {
        let count = self
            .info
            .align_samples(output.len().min(self.info.to_samples(data.len())));
        let octets = self.info.to_bytes(count);

        let reader = CodewordReader::new(&data[..octets], self.variant.bits);
        let mut produced = 0;
        for (slot, code) in output[..count].iter_mut().zip(reader) {
            *slot = adpcm::decode_sample(code, &mut self.decoder, self.variant);
            produced += 1;
        }

        trace!("{}: decoded {} octets into {} samples", self.info.annotation, octets, produced);
        produced
    }

    fn reset(&mut self) {
        self.encoder.reset();
        self.decoder.reset();
    }
}
