//! Core types and traits for the codec library
//!
//! This module defines the format descriptor every codec publishes, the closed
//! set of encodings the library knows about, and the [`AudioCodec`] capability
//! interface every worker implements.

use crate::error::{CodecError, Result};
use crate::utils::{validate_frame_size, validate_sample_rate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signal level (average or peak magnitude) in linear sample units
pub type Level = i16;

/// Window used by table-driven level metrics when the caller passes zero
/// samples: 20 ms at 8 kHz.
pub const DEFAULT_LEVEL_WINDOW: usize = 160;

/// Wire encodings understood by the library
///
/// The set is closed; externally supplied codecs plug in under the GSM and
/// Speex tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// G.711 mu-law, 64 kbit/s
    MuLaw,
    /// G.711 a-law, 64 kbit/s
    ALaw,
    /// G.721 ADPCM, 32 kbit/s (4-bit codewords)
    G721Adpcm,
    /// G.723 ADPCM, 16 kbit/s (2-bit codewords)
    G723Adpcm16,
    /// G.723 ADPCM, 24 kbit/s (3-bit codewords)
    G723Adpcm24,
    /// G.723 ADPCM, 40 kbit/s (5-bit codewords)
    G723Adpcm40,
    /// OKI ADPCM at 8 kHz
    OkiAdpcm,
    /// Dialogic VOX ADPCM at 6 kHz
    VoxAdpcm,
    /// GSM full rate, supplied by an external library
    GsmVoice,
    /// Speex narrowband, supplied by an external library
    SpeexVoice,
    /// Speex wideband, supplied by an external library
    SpeexAudio,
    /// 16-bit linear PCM, mono
    Pcm16Mono,
    /// 16-bit linear PCM, interleaved stereo
    Pcm16Stereo,
}

impl Encoding {
    /// Every encoding, in declaration order
    pub const ALL: [Encoding; 13] = [
        Self::MuLaw,
        Self::ALaw,
        Self::G721Adpcm,
        Self::G723Adpcm16,
        Self::G723Adpcm24,
        Self::G723Adpcm40,
        Self::OkiAdpcm,
        Self::VoxAdpcm,
        Self::GsmVoice,
        Self::SpeexVoice,
        Self::SpeexAudio,
        Self::Pcm16Mono,
        Self::Pcm16Stereo,
    ];

    /// Canonical name, also used as the default annotation
    pub fn name(self) -> &'static str {
        match self {
            Self::MuLaw => "mu-law",
            Self::ALaw => "a-law",
            Self::G721Adpcm => "g.721",
            Self::G723Adpcm16 => "g.723/2",
            Self::G723Adpcm24 => "g.723/3",
            Self::G723Adpcm40 => "g.723/5",
            Self::OkiAdpcm => "oki",
            Self::VoxAdpcm => "vox",
            Self::GsmVoice => "gsm",
            Self::SpeexVoice => "speex/8000",
            Self::SpeexAudio => "speex/16000",
            Self::Pcm16Mono => "pcm16",
            Self::Pcm16Stereo => "pcm16/stereo",
        }
    }

    /// Parse a textual encoding name, accepting the usual aliases
    pub fn from_name(name: &str) -> Option<Self> {
        let encoding = match name.trim().to_ascii_lowercase().as_str() {
            "mu-law" | "mulaw" | "ulaw" | "pcmu" | "g.711u" | "g711u" => Self::MuLaw,
            "a-law" | "alaw" | "pcma" | "g.711a" | "g711a" => Self::ALaw,
            "g.721" | "g721" | "g726-32" | "adpcm" => Self::G721Adpcm,
            "g.723/2" | "g723-16" | "g726-16" => Self::G723Adpcm16,
            "g.723/3" | "g723-24" | "g726-24" => Self::G723Adpcm24,
            "g.723/5" | "g723-40" | "g726-40" => Self::G723Adpcm40,
            "oki" => Self::OkiAdpcm,
            "vox" | "dialogic" => Self::VoxAdpcm,
            "gsm" => Self::GsmVoice,
            "speex" | "speex/8000" => Self::SpeexVoice,
            "speex/16000" => Self::SpeexAudio,
            "pcm16" | "l16" | "linear" => Self::Pcm16Mono,
            "pcm16/stereo" | "l16/stereo" => Self::Pcm16Stereo,
            _ => return None,
        };
        Some(encoding)
    }

    /// Static RTP payload type, where one is assigned
    pub fn payload_type(self) -> Option<u8> {
        match self {
            Self::MuLaw => Some(0),
            Self::GsmVoice => Some(3),
            Self::ALaw => Some(8),
            _ => None,
        }
    }

    /// Encoding carrying the given static RTP payload type
    pub fn from_payload_type(payload_type: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|encoding| encoding.payload_type() == Some(payload_type))
    }

    /// True for uncompressed linear sample encodings
    pub fn is_linear(self) -> bool {
        matches!(self, Self::Pcm16Mono | Self::Pcm16Stereo)
    }

    /// Width of one sample word on the wire, in octets
    ///
    /// Compressed bitstreams are octet streams and report 1.
    pub fn sample_width(self) -> usize {
        if self.is_linear() {
            2
        } else {
            1
        }
    }

    /// Sample rates the encoding may be declared with; empty means any
    pub fn supported_rates(self) -> &'static [u32] {
        match self {
            Self::MuLaw
            | Self::ALaw
            | Self::G721Adpcm
            | Self::G723Adpcm16
            | Self::G723Adpcm24
            | Self::G723Adpcm40
            | Self::GsmVoice
            | Self::SpeexVoice => &[8000],
            Self::OkiAdpcm | Self::VoxAdpcm => &[6000, 8000],
            Self::SpeexAudio => &[16000],
            Self::Pcm16Mono | Self::Pcm16Stereo => &[],
        }
    }

    /// True when the encoding has a fixed relation between framing and bitrate
    pub fn is_fixed_rate(self) -> bool {
        !matches!(self, Self::SpeexVoice | Self::SpeexAudio)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| CodecError::unsupported_encoding(s))
    }
}

/// Byte order of multi-octet sample words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Least significant octet first
    Little,
    /// Most significant octet first
    Big,
}

impl ByteOrder {
    /// Byte order of the host
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

/// Container layout the frames were demultiplexed from
///
/// Informational only; the library never parses containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PcmLayout {
    /// Headerless raw frames
    #[default]
    Raw,
    /// Sun/NeXT `.au`
    Snd,
    /// RIFF container
    Riff,
    /// RIFF/WAVE
    Wave,
}

/// Format descriptor: framing and signal parameters of one codec stream
///
/// A codec builds its descriptor once in its constructor; workers never change
/// it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Wire encoding
    pub encoding: Encoding,
    /// Sample rate in Hz
    pub rate: u32,
    /// Bitrate in bits per second
    pub bitrate: u32,
    /// Octets in one encoded frame
    pub framesize: usize,
    /// Linear samples in one encoded frame
    pub framecount: usize,
    /// Byte order of multi-octet sample words
    #[serde(default)]
    pub order: ByteOrder,
    /// Container layout
    #[serde(default)]
    pub layout: PcmLayout,
    /// Free-form annotation, e.g. `"g.723/3"`
    #[serde(default)]
    pub annotation: String,
}

impl FormatDescriptor {
    /// Descriptor with the default framing of `encoding`
    pub fn new(encoding: Encoding) -> Self {
        let (rate, framesize, framecount) = match encoding {
            Encoding::MuLaw | Encoding::ALaw => (8000, 1, 1),
            Encoding::G721Adpcm => (8000, 1, 2),
            Encoding::G723Adpcm16 => (8000, 1, 4),
            Encoding::G723Adpcm24 => (8000, 3, 8),
            Encoding::G723Adpcm40 => (8000, 5, 8),
            Encoding::OkiAdpcm => (8000, 1, 2),
            Encoding::VoxAdpcm => (6000, 1, 2),
            Encoding::GsmVoice => (8000, 33, 160),
            Encoding::SpeexVoice => (8000, 20, 160),
            Encoding::SpeexAudio => (16000, 40, 320),
            Encoding::Pcm16Mono => (8000, 2, 1),
            Encoding::Pcm16Stereo => (8000, 4, 1),
        };

        Self {
            encoding,
            rate,
            bitrate: framing_bitrate(rate, framesize, framecount),
            framesize,
            framecount,
            order: ByteOrder::native(),
            layout: PcmLayout::Raw,
            annotation: encoding.name().to_string(),
        }
    }

    /// Set the sample rate, keeping the bitrate consistent with the framing
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self.bitrate = framing_bitrate(rate, self.framesize, self.framecount);
        self
    }

    /// Override the bitrate
    pub fn with_bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Set the frame contract, keeping the bitrate consistent with it
    pub fn with_framing(mut self, framesize: usize, framecount: usize) -> Self {
        self.framesize = framesize;
        self.framecount = framecount;
        self.bitrate = framing_bitrate(self.rate, framesize, framecount);
        self
    }

    /// Set the byte order
    pub fn with_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the container layout
    pub fn with_layout(mut self, layout: PcmLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the annotation
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// Whole-frame sample count carried by `bytes` encoded octets
    pub fn to_samples(&self, bytes: usize) -> usize {
        if self.framesize == 0 {
            return 0;
        }
        (bytes / self.framesize) * self.framecount
    }

    /// Whole-frame octet count needed for `samples` linear samples
    pub fn to_bytes(&self, samples: usize) -> usize {
        if self.framecount == 0 {
            return 0;
        }
        (samples / self.framecount) * self.framesize
    }

    /// `samples` rounded down to a whole number of frames
    pub fn align_samples(&self, samples: usize) -> usize {
        if self.framecount == 0 {
            return 0;
        }
        samples - samples % self.framecount
    }

    /// Duration of one frame in milliseconds
    pub fn frame_duration_ms(&self) -> f64 {
        if self.rate == 0 {
            return 0.0;
        }
        (self.framecount as f64 * 1000.0) / self.rate as f64
    }

    /// True when the encoding carries uncompressed samples
    pub fn is_linear(&self) -> bool {
        self.encoding.is_linear()
    }

    /// True when octets must be swapped to reach host order
    pub fn needs_swap(&self) -> bool {
        self.encoding.sample_width() > 1 && self.order != ByteOrder::native()
    }

    /// Validate the descriptor
    ///
    /// Checks non-zero framing, a rate the encoding supports, and for
    /// fixed-rate encodings that the bitrate matches the framing.
    pub fn validate(&self) -> Result<()> {
        if self.framesize == 0 || self.framecount == 0 {
            return Err(CodecError::invalid_config(format!(
                "{}: framing must be non-zero ({} octets / {} samples)",
                self.encoding, self.framesize, self.framecount
            )));
        }

        validate_sample_rate(self.encoding, self.rate)?;

        if self.encoding.is_fixed_rate() {
            let expected = framing_bitrate(self.rate, self.framesize, self.framecount);
            if self.bitrate != expected {
                return Err(CodecError::InvalidBitrate {
                    bitrate: self.bitrate,
                    expected,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}Hz, {}bps, {} octets/{} samples)",
            self.annotation, self.rate, self.bitrate, self.framesize, self.framecount
        )
    }
}

fn framing_bitrate(rate: u32, framesize: usize, framecount: usize) -> u32 {
    if framecount == 0 {
        return 0;
    }
    (rate as u64 * framesize as u64 * 8 / framecount as u64) as u32
}

/// Capability interface implemented by every codec worker
///
/// A worker owns the adaptive state of exactly one logical stream. Nothing in
/// a worker is synchronized: one stream, ordinarily one thread, drives a given
/// worker. Use one worker per stream rather than sharing.
///
/// Counts returned by encode and decode are always whole multiples of the
/// codec's batch size ([`FormatDescriptor::framecount`]); a trailing partial
/// batch is left unprocessed for the caller to carry over.
pub trait AudioCodec: Send {
    /// Format descriptor of this worker
    fn info(&self) -> &FormatDescriptor;

    /// Encode into a caller-supplied buffer (allocation free)
    ///
    /// Consumes the batch-aligned prefix of `samples` and returns the number
    /// of samples consumed. `output` must hold `info().to_bytes(samples.len())`
    /// octets.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferTooSmall`] if `output` is too short.
    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize>;

    /// Decode into a caller-supplied buffer (allocation free)
    ///
    /// Produces as many whole batches as both `data` and `output` allow and
    /// returns the number of samples produced.
    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> usize;

    /// Restore the adaptive state to its initial values
    fn reset(&mut self);

    /// Wire encoding of this worker
    fn encoding(&self) -> Encoding {
        self.info().encoding
    }

    /// Samples processed as one atomic unit
    fn batch_size(&self) -> usize {
        self.info().framecount
    }

    /// Encoded octets per frame
    fn estimated(&self) -> usize {
        self.info().framesize
    }

    /// Linear samples per frame
    fn required(&self) -> usize {
        self.info().framecount
    }

    /// Encode, allocating the output
    ///
    /// Returns the encoded octets and the number of samples consumed.
    fn encode(&mut self, samples: &[i16]) -> (Vec<u8>, usize) {
        let mut output = vec![0u8; self.info().to_bytes(samples.len())];
        let consumed = self.encode_to_buffer(samples, &mut output).unwrap_or(0);
        output.truncate(self.info().to_bytes(consumed));
        (output, consumed)
    }

    /// Decode, allocating the output; the vector length is the produced count
    fn decode(&mut self, data: &[u8]) -> Vec<i16> {
        let mut output = vec![0i16; self.info().to_samples(data.len())];
        let produced = self.decode_to_buffer(data, &mut output);
        output.truncate(produced);
        output
    }

    /// Copy of exactly one encoded frame, or `None` if `data` is not one frame
    fn packet(&self, data: &[u8]) -> Option<Vec<u8>> {
        validate_frame_size(data, self.info().framesize)
            .ok()
            .map(|()| data.to_vec())
    }

    /// Average magnitude of the first `samples` encoded samples in `data`
    ///
    /// The generic form decodes the window, which advances this worker's
    /// decoder state like any other decode.
    fn impulse(&mut self, data: &[u8], samples: usize) -> Level {
        let wanted = samples.min(self.info().to_samples(data.len()));
        let mut linear = vec![0i16; wanted];
        let count = self.decode_to_buffer(data, &mut linear);
        if count == 0 {
            return 0;
        }

        let sum: u64 = linear[..count]
            .iter()
            .map(|&sample| (sample as i32).unsigned_abs() as u64)
            .sum();
        (sum / count as u64).min(Level::MAX as u64) as Level
    }

    /// Maximum magnitude of the first `samples` encoded samples in `data`
    fn peak(&mut self, data: &[u8], samples: usize) -> Level {
        let wanted = samples.min(self.info().to_samples(data.len()));
        let mut linear = vec![0i16; wanted];
        let count = self.decode_to_buffer(data, &mut linear);

        linear[..count]
            .iter()
            .map(|&sample| (sample as i32).unsigned_abs())
            .max()
            .unwrap_or(0)
            .min(Level::MAX as u32) as Level
    }

    /// True when the impulse power of the window is at or below `hint`
    fn is_silent(&mut self, hint: Level, data: &[u8], samples: usize) -> bool {
        let power = self.impulse(data, samples);
        power < 0 || power <= hint
    }
}
