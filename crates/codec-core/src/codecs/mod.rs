//! Codec implementations, registry and factory
//!
//! Every codec family contributes a prototype: a long-lived template that
//! describes the codec and builds independent workers. The process-wide
//! [`CodecRegistry`] holds prototypes; callers look up by encoding (and
//! optionally a format string) and receive a fresh worker they own.

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, Encoding, FormatDescriptor};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

// Codec implementations
#[cfg(feature = "g711")]
pub mod g711;

#[cfg(feature = "g72x")]
pub mod g72x;

#[cfg(feature = "oki")]
pub mod oki;

#[cfg(feature = "external")]
pub mod external;

/// Template for one codec family, stored in a registry
///
/// Prototypes are shared between threads and never process audio themselves;
/// every build method returns a new worker with fresh adaptive state.
pub trait CodecPrototype: Send + Sync {
    /// Registration name
    fn name(&self) -> &str;

    /// Default format descriptor
    fn info(&self) -> &FormatDescriptor;

    /// Encoding of the default descriptor
    fn encoding(&self) -> Encoding {
        self.info().encoding
    }

    /// True if this prototype can build workers for `encoding`
    fn handles(&self, encoding: Encoding) -> bool {
        self.encoding() == encoding
    }

    /// Build a worker with the default descriptor
    fn create(&self) -> Result<Box<dyn AudioCodec>>;

    /// Build a worker for a format string
    fn by_format(&self, format: &str) -> Result<Box<dyn AudioCodec>> {
        let _ = format;
        self.create()
    }

    /// Build a worker for a full descriptor
    fn by_info(&self, info: &FormatDescriptor) -> Result<Box<dyn AudioCodec>> {
        let _ = info;
        self.create()
    }
}

/// Builder used by [`BuiltinPrototype`]
pub type BuildFn = fn(&FormatDescriptor) -> Result<Box<dyn AudioCodec>>;

/// Prototype for a codec implemented in this crate
pub struct BuiltinPrototype {
    info: FormatDescriptor,
    build: BuildFn,
}

impl BuiltinPrototype {
    /// Prototype for `encoding`, building workers with `build`
    pub fn new(encoding: Encoding, build: BuildFn) -> Self {
        Self {
            info: FormatDescriptor::new(encoding),
            build,
        }
    }
}

impl fmt::Debug for BuiltinPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinPrototype")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl CodecPrototype for BuiltinPrototype {
    fn name(&self) -> &str {
        &self.info.annotation
    }

    fn info(&self) -> &FormatDescriptor {
        &self.info
    }

    fn create(&self) -> Result<Box<dyn AudioCodec>> {
        (self.build)(&self.info)
    }

    fn by_info(&self, info: &FormatDescriptor) -> Result<Box<dyn AudioCodec>> {
        if info.encoding == self.info.encoding {
            info.validate()?;
            (self.build)(info)
        } else {
            self.create()
        }
    }
}

/// Prototypes for every codec compiled into this crate
///
/// Order: mu-law, a-law, G.721, G.723 16/24/40 kbit/s, OKI, VOX.
pub fn builtin_prototypes() -> Vec<Arc<dyn CodecPrototype>> {
    #[allow(unused_mut)]
    let mut prototypes: Vec<Arc<dyn CodecPrototype>> = Vec::new();

    #[cfg(feature = "g711")]
    for encoding in [Encoding::MuLaw, Encoding::ALaw] {
        prototypes.push(Arc::new(BuiltinPrototype::new(encoding, |info| {
            Ok(Box::new(g711::G711Codec::from_encoding(info.encoding)?))
        })));
    }

    #[cfg(feature = "g72x")]
    for encoding in [
        Encoding::G721Adpcm,
        Encoding::G723Adpcm16,
        Encoding::G723Adpcm24,
        Encoding::G723Adpcm40,
    ] {
        prototypes.push(Arc::new(BuiltinPrototype::new(encoding, |info| {
            Ok(Box::new(g72x::G72xCodec::new(info.encoding)?))
        })));
    }

    #[cfg(feature = "oki")]
    for encoding in [Encoding::OkiAdpcm, Encoding::VoxAdpcm] {
        prototypes.push(Arc::new(BuiltinPrototype::new(encoding, |info| {
            Ok(Box::new(oki::OkiCodec::with_rate(info.encoding, info.rate)?))
        })));
    }

    prototypes
}

/// Append-only collection of codec prototypes
///
/// Lookups scan newest first, so a later registration for an encoding takes
/// precedence over an earlier one. Reads never block each other.
pub struct CodecRegistry {
    prototypes: RwLock<Vec<Arc<dyn CodecPrototype>>>,
}

static GLOBAL_REGISTRY: Lazy<CodecRegistry> = Lazy::new(|| {
    let registry = CodecRegistry::with_builtins();
    debug!("Global codec registry ready with {} prototypes", registry.len());
    registry
});

impl CodecRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            prototypes: RwLock::new(Vec::new()),
        }
    }

    /// Create a registry holding every built-in prototype
    pub fn with_builtins() -> Self {
        Self {
            prototypes: RwLock::new(builtin_prototypes()),
        }
    }

    /// The process-wide registry, populated with the built-ins on first use
    pub fn global() -> &'static CodecRegistry {
        &GLOBAL_REGISTRY
    }

    /// Add a prototype
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DuplicateCodec`] if the name is taken.
    pub fn register(&self, prototype: Arc<dyn CodecPrototype>) -> Result<()> {
        let mut prototypes = self.prototypes.write();
        if prototypes.iter().any(|p| p.name() == prototype.name()) {
            return Err(CodecError::DuplicateCodec {
                name: prototype.name().to_string(),
            });
        }

        debug!(
            "Registered codec {} ({})",
            prototype.name(),
            prototype.encoding()
        );
        prototypes.push(prototype);
        Ok(())
    }

    /// Newest prototype handling `encoding`
    pub fn find(&self, encoding: Encoding) -> Option<Arc<dyn CodecPrototype>> {
        self.prototypes
            .read()
            .iter()
            .rev()
            .find(|p| p.handles(encoding))
            .cloned()
    }

    /// Prototype registered under `name`
    pub fn find_by_name(&self, name: &str) -> Option<Arc<dyn CodecPrototype>> {
        self.prototypes
            .read()
            .iter()
            .rev()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Worker for `encoding`, shaped by `format` when one is given
    ///
    /// Returns `None` if no prototype handles the encoding or the prototype
    /// fails to build a worker.
    pub fn lookup(&self, encoding: Encoding, format: Option<&str>) -> Option<Box<dyn AudioCodec>> {
        let prototype = self.find(encoding)?;
        let worker = match format {
            Some(format) => prototype.by_format(format),
            None => prototype.create(),
        };
        Self::built(prototype.name(), worker)
    }

    /// Worker for a full descriptor
    pub fn lookup_info(&self, info: &FormatDescriptor) -> Option<Box<dyn AudioCodec>> {
        let prototype = self.find(info.encoding)?;
        Self::built(prototype.name(), prototype.by_info(info))
    }

    fn built(name: &str, worker: Result<Box<dyn AudioCodec>>) -> Option<Box<dyn AudioCodec>> {
        match worker {
            Ok(worker) => {
                trace!("Built {} worker", name);
                Some(worker)
            }
            Err(e) => {
                warn!("Codec {} failed to build a worker: {}", name, e);
                None
            }
        }
    }

    /// Release a worker obtained from a lookup
    ///
    /// Workers are owned values, so this is a plain drop; prototypes live in
    /// the registry and are never handed out.
    pub fn release(worker: Box<dyn AudioCodec>) {
        trace!("Released {} worker", worker.info().annotation);
        drop(worker);
    }

    /// Snapshot of the registered prototypes, oldest first
    pub fn prototypes(&self) -> Vec<Arc<dyn CodecPrototype>> {
        self.prototypes.read().clone()
    }

    /// Number of registered prototypes
    pub fn len(&self) -> usize {
        self.prototypes.read().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.prototypes.read().is_empty()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .prototypes
            .read()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        f.debug_struct("CodecRegistry").field("prototypes", &names).finish()
    }
}

/// Codec factory over the global registry
///
/// Same lookups as [`CodecRegistry`], reporting failures as errors.
pub struct CodecFactory;

impl CodecFactory {
    /// Create a worker for an encoding
    pub fn create(encoding: Encoding) -> Result<Box<dyn AudioCodec>> {
        Self::prototype(encoding)?.create()
    }

    /// Create a worker for a full descriptor
    pub fn create_from_info(info: &FormatDescriptor) -> Result<Box<dyn AudioCodec>> {
        info.validate()?;
        Self::prototype(info.encoding)?.by_info(info)
    }

    /// Create a worker by encoding name or registration name
    pub fn create_by_name(name: &str) -> Result<Box<dyn AudioCodec>> {
        if let Some(encoding) = Encoding::from_name(name) {
            return Self::create(encoding);
        }

        CodecRegistry::global()
            .find_by_name(name)
            .ok_or_else(|| CodecError::codec_not_found(name))?
            .create()
    }

    /// Create a worker by static RTP payload type
    pub fn create_by_payload_type(payload_type: u8) -> Result<Box<dyn AudioCodec>> {
        let encoding = Encoding::from_payload_type(payload_type)
            .ok_or_else(|| CodecError::codec_not_found(format!("PT{}", payload_type)))?;
        Self::create(encoding)
    }

    /// Encodings the global registry can currently build
    pub fn supported_codecs() -> Vec<Encoding> {
        let registry = CodecRegistry::global();
        Encoding::ALL
            .into_iter()
            .filter(|&encoding| registry.find(encoding).is_some())
            .collect()
    }

    /// Check if an encoding name is supported
    pub fn is_supported(name: &str) -> bool {
        Encoding::from_name(name)
            .map(|encoding| CodecRegistry::global().find(encoding).is_some())
            .unwrap_or(false)
    }

    fn prototype(encoding: Encoding) -> Result<Arc<dyn CodecPrototype>> {
        CodecRegistry::global()
            .find(encoding)
            .ok_or_else(|| CodecError::codec_not_found(encoding.name()))
    }
}
