//! OKI / Dialogic VOX ADPCM
//!
//! 4-bit ADPCM over 12-bit samples with a 49-entry step table. Two codewords
//! per octet; the first sample of a pair occupies the high nibble. OKI runs at
//! 8 kHz, VOX at 6 kHz; the coding is identical.

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, Encoding, FormatDescriptor};
use crate::utils::validate_output_size;
use tracing::{debug, trace};

/// Step size adjustment, indexed by the magnitude bits of a codeword
const INDEX_ADJUST: [i16; 8] = [-1, -1, -1, -1, 2, 4, 6, 8];

/// Quantizer step sizes
const STEPS: [i16; 49] = [
    16, 17, 19, 21, 23, 25, 28, 31, 34, 37, 41, 45, 50, 55, 60, 66, 73, 80, 88, 97, 107, 118, 130,
    143, 157, 173, 190, 209, 230, 253, 279, 307, 337, 371, 408, 449, 494, 544, 598, 658, 724, 796,
    876, 963, 1060, 1166, 1282, 1411, 1552,
];

/// Largest magnitude of the 12-bit internal signal
const SAMPLE_LIMIT: i16 = 2047;

/// Scale between 16-bit linear samples and the 12-bit internal signal
const SCALE: i16 = 16;

/// Adaptive state for one direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OkiState {
    /// Last reconstructed 12-bit sample
    pub last: i16,
    /// Index into the step table
    pub index: i16,
}

impl OkiState {
    /// Decode one 4-bit codeword to a 12-bit sample
    pub fn decode(&mut self, code: u8) -> i16 {
        let step = STEPS[self.index as usize];

        let mut diff = step / 8;
        if code & 0x01 != 0 {
            diff += step / 4;
        }
        if code & 0x02 != 0 {
            diff += step / 2;
        }
        if code & 0x04 != 0 {
            diff += step;
        }
        if code & 0x08 != 0 {
            diff = -diff;
        }

        let sample = (self.last + diff).clamp(-SAMPLE_LIMIT, SAMPLE_LIMIT);
        self.last = sample;
        self.index = (self.index + INDEX_ADJUST[(code & 0x07) as usize]).clamp(0, 48);
        sample
    }

    /// Encode one 12-bit sample to a 4-bit codeword
    ///
    /// The state advances through [`decode`](Self::decode) so both directions
    /// see the same reconstruction.
    pub fn encode(&mut self, sample: i16) -> u8 {
        let step = STEPS[self.index as usize];
        let mut code = 0u8;

        let mut diff = sample - self.last;
        if diff < 0 {
            diff = -diff;
            code = 0x08;
        }

        if diff >= step {
            code |= 0x04;
            diff -= step;
        }
        if diff >= step / 2 {
            code |= 0x02;
            diff -= step / 2;
        }
        if diff >= step / 4 {
            code |= 0x01;
        }

        self.decode(code);
        code
    }
}

/// OKI / VOX ADPCM codec worker
#[derive(Debug, Clone)]
pub struct OkiCodec {
    info: FormatDescriptor,
    encoder: OkiState,
    decoder: OkiState,
}

impl OkiCodec {
    /// Create a worker at the encoding's default rate
    pub fn new(encoding: Encoding) -> Result<Self> {
        Self::with_rate(encoding, FormatDescriptor::new(encoding).rate)
    }

    /// Create a worker at an explicit sample rate
    pub fn with_rate(encoding: Encoding, rate: u32) -> Result<Self> {
        if !matches!(encoding, Encoding::OkiAdpcm | Encoding::VoxAdpcm) {
            return Err(CodecError::unsupported_encoding(encoding.name()));
        }

        let info = FormatDescriptor::new(encoding).with_rate(rate);
        info.validate()?;
        Ok(Self::from_info(info))
    }

    fn from_info(info: FormatDescriptor) -> Self {
        debug!("Created {} ADPCM codec at {}Hz", info.annotation, info.rate);
        Self {
            info,
            encoder: OkiState::default(),
            decoder: OkiState::default(),
        }
    }

    /// Encoder adaptive state
    pub fn encoder_state(&self) -> OkiState {
        self.encoder
    }

    /// Decoder adaptive state
    pub fn decoder_state(&self) -> OkiState {
        self.decoder
    }
}

impl AudioCodec for OkiCodec {
    fn info(&self) -> &FormatDescriptor {
        &self.info
    }

    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize> {
        let count = self.info.align_samples(samples.len());
        let needed = count / 2;
        validate_output_size(needed, output.len())?;

        for (slot, pair) in output.iter_mut().zip(samples[..count].chunks_exact(2)) {
            let high = self.encoder.encode(pair[0] / SCALE);
            let low = self.encoder.encode(pair[1] / SCALE);
            *slot = (high << 4) | low;
        }

        trace!("{}: encoded {} samples", self.info.annotation, count);
        Ok(count)
    }

    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> usize {
        let pairs = data.len().min(output.len() / 2);
        for (&byte, pair) in data[..pairs].iter().zip(output.chunks_exact_mut(2)) {
            pair[0] = self.decoder.decode(byte >> 4) * SCALE;
            pair[1] = self.decoder.decode(byte & 0x0F) * SCALE;
        }

        trace!("{}: decoded {} samples", self.info.annotation, pairs * 2);
        pairs * 2
    }

    fn reset(&mut self) {
        self.encoder = OkiState::default();
        self.decoder = OkiState::default();
    }
}
