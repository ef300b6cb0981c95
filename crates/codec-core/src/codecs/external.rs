//! Externally supplied frame codecs
//!
//! GSM and Speex are not implemented here. A host links a library and adapts
//! its per-frame entry points to [`FrameCodec`]; [`ExternalPrototype`] then
//! registers it like any built-in codec. The library only has to honor a fixed
//! frame contract: [`FormatDescriptor::framecount`] samples in,
//! [`FormatDescriptor::framesize`] octets out.

use super::CodecPrototype;
use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, Encoding, FormatDescriptor};
use crate::utils::validate_output_size;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Per-frame entry points of an external codec library
///
/// Each call processes exactly one frame. Slices are sized by the descriptor
/// the codec was created for.
pub trait FrameCodec: Send {
    /// Encode one frame of samples into one frame of octets
    fn encode_frame(&mut self, samples: &[i16], frame: &mut [u8]) -> Result<()>;

    /// Decode one frame of octets into one frame of samples
    fn decode_frame(&mut self, frame: &[u8], samples: &mut [i16]) -> Result<()>;

    /// Drop any inter-frame state
    fn reset(&mut self) {}
}

/// Constructor for library instances, called once per worker
pub type FrameCodecFactory =
    Arc<dyn Fn(&FormatDescriptor) -> Result<Box<dyn FrameCodec>> + Send + Sync>;

/// Worker driving a [`FrameCodec`] frame by frame
///
/// Processing stops at the first frame the library rejects; the counts
/// returned cover only the frames before it.
pub struct ExternalCodec {
    info: FormatDescriptor,
    inner: Box<dyn FrameCodec>,
}

impl ExternalCodec {
    /// Wrap a library instance under `info`
    pub fn new(info: FormatDescriptor, inner: Box<dyn FrameCodec>) -> Result<Self> {
        if info.framesize == 0 || info.framecount == 0 {
            return Err(CodecError::invalid_config(format!(
                "{}: external codecs need a non-zero frame contract",
                info.annotation
            )));
        }
        Ok(Self { info, inner })
    }
}

impl fmt::Debug for ExternalCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalCodec")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl AudioCodec for ExternalCodec {
    fn info(&self) -> &FormatDescriptor {
        &self.info
    }

    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize> {
        let frames = samples.len() / self.info.framecount;
        let needed = frames * self.info.framesize;
        validate_output_size(needed, output.len())?;

        let mut done = 0;
        for (pcm, frame) in samples
            .chunks_exact(self.info.framecount)
            .zip(output.chunks_exact_mut(self.info.framesize))
        {
            if let Err(e) = self.inner.encode_frame(pcm, frame) {
                warn!("{}: encode stopped after {} frames: {}", self.info.annotation, done, e);
                break;
            }
            done += 1;
        }

        trace!("{}: encoded {} frames", self.info.annotation, done);
        Ok(done * self.info.framecount)
    }

    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> usize {
        let mut done = 0;
        for (frame, pcm) in data
            .chunks_exact(self.info.framesize)
            .zip(output.chunks_exact_mut(self.info.framecount))
        {
            if let Err(e) = self.inner.decode_frame(frame, pcm) {
                warn!("{}: decode stopped after {} frames: {}", self.info.annotation, done, e);
                break;
            }
            done += 1;
        }

        trace!("{}: decoded {} frames", self.info.annotation, done);
        done * self.info.framecount
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Registry prototype for an external library
///
/// One prototype may expose several variants (Speex narrowband and wideband,
/// say). The first variant is the default.
pub struct ExternalPrototype {
    name: String,
    variants: Vec<FormatDescriptor>,
    factory: FrameCodecFactory,
}

impl ExternalPrototype {
    /// Prototype for `variants`, building library instances with `factory`
    ///
    /// # Errors
    ///
    /// Fails if no variant is given or any variant does not validate.
    pub fn new<F>(name: impl Into<String>, variants: Vec<FormatDescriptor>, factory: F) -> Result<Self>
    where
        F: Fn(&FormatDescriptor) -> Result<Box<dyn FrameCodec>> + Send + Sync + 'static,
    {
        let name = name.into();
        if variants.is_empty() {
            return Err(CodecError::invalid_config(format!("{}: no variants", name)));
        }
        for variant in &variants {
            variant.validate()?;
        }

        debug!("External codec {} offers {} variant(s)", name, variants.len());
        Ok(Self {
            name,
            variants,
            factory: Arc::new(factory),
        })
    }

    /// Variants this prototype can build
    pub fn variants(&self) -> &[FormatDescriptor] {
        &self.variants
    }

    fn build(&self, info: &FormatDescriptor) -> Result<Box<dyn AudioCodec>> {
        let inner = (self.factory)(info)?;
        Ok(Box::new(ExternalCodec::new(info.clone(), inner)?))
    }

    fn default_variant(&self) -> &FormatDescriptor {
        &self.variants[0]
    }
}

impl fmt::Debug for ExternalPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalPrototype")
            .field("name", &self.name)
            .field("variants", &self.variants)
            .finish_non_exhaustive()
    }
}

impl CodecPrototype for ExternalPrototype {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> &FormatDescriptor {
        self.default_variant()
    }

    fn handles(&self, encoding: Encoding) -> bool {
        self.variants.iter().any(|variant| variant.encoding == encoding)
    }

    fn create(&self) -> Result<Box<dyn AudioCodec>> {
        self.build(self.default_variant())
    }

    /// Variant whose annotation prefixes `format` or is prefixed by it
    ///
    /// An empty format selects the default variant.
    fn by_format(&self, format: &str) -> Result<Box<dyn AudioCodec>> {
        let format = format.trim().to_ascii_lowercase();
        let variant = self
            .variants
            .iter()
            .find(|variant| {
                let annotation = variant.annotation.to_ascii_lowercase();
                format.starts_with(&annotation) || annotation.starts_with(&format)
            })
            .ok_or_else(|| {
                CodecError::invalid_format(format!("{}: no variant for {:?}", self.name, format))
            })?;
        self.build(variant)
    }

    /// Variant matching encoding and rate, then encoding alone
    fn by_info(&self, info: &FormatDescriptor) -> Result<Box<dyn AudioCodec>> {
        let variant = self
            .variants
            .iter()
            .find(|variant| variant.encoding == info.encoding && variant.rate == info.rate)
            .or_else(|| {
                self.variants
                    .iter()
                    .find(|variant| variant.encoding == info.encoding)
            })
            .unwrap_or_else(|| self.default_variant());
        self.build(variant)
    }
}
