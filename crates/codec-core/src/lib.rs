//! # Voicecodec-Core: Narrowband Telephony Transcoding
//!
//! This library converts 16-bit linear PCM to and from the compressed
//! encodings used on telephone lines, voice mail systems and IVR platforms,
//! and provides the buffering needed to move encoded audio between threads.
//!
//! ## Features
//!
//! - **G.711 (mu-law / a-law)**: table-driven companding with level metrics
//!   read straight from the encoded octets
//! - **G.721 / G.723**: ADPCM at 16, 24, 32 and 40 kbit/s, bit-exact with the
//!   fixed-point reference arithmetic
//! - **OKI / Dialogic VOX**: 4-bit ADPCM at 6 or 8 kHz
//! - **External codecs**: plumbing for GSM and Speex style frame libraries
//! - **Ring buffer**: thread-safe hand-off between an encode/decode flow and
//!   a transport, with byte-order correction for linear formats
//!
//! ## Usage
//!
//! ```rust
//! use voicecodec_core::{AudioCodec, CodecRegistry, Encoding};
//!
//! // Every lookup yields an independent worker for one stream
//! let mut codec = CodecRegistry::global()
//!     .lookup(Encoding::G721Adpcm, None)
//!     .expect("g.721 is built in");
//!
//! let samples = vec![0i16; 160]; // 20ms at 8kHz
//! let (encoded, consumed) = codec.encode(&samples);
//! assert_eq!(consumed, 160);
//! assert_eq!(encoded.len(), 80);
//!
//! let decoded = codec.decode(&encoded);
//! assert_eq!(decoded.len(), 160);
//! ```
//!
//! ## Feature Flags
//!
//! - `g711`: mu-law / a-law codecs (enabled by default)
//! - `g72x`: G.721 and G.723 ADPCM codecs (enabled by default)
//! - `oki`: OKI / VOX ADPCM codecs (enabled by default)
//! - `external`: frame-codec plumbing for external libraries (enabled by default)

#![warn(missing_docs)]

pub mod buffer;
pub mod codecs;
pub mod error;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

pub use buffer::{EncodedBuffer, NativeAdapter, RingBuffer};
pub use codecs::{CodecFactory, CodecPrototype, CodecRegistry};
pub use error::{CodecError, Result};
pub use types::{AudioCodec, ByteOrder, Encoding, FormatDescriptor, Level, PcmLayout};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Built-in codec names
pub const SUPPORTED_CODECS: &[&str] = &[
    #[cfg(feature = "g711")]
    "mu-law",
    #[cfg(feature = "g711")]
    "a-law",
    #[cfg(feature = "g72x")]
    "g.721",
    #[cfg(feature = "g72x")]
    "g.723/2",
    #[cfg(feature = "g72x")]
    "g.723/3",
    #[cfg(feature = "g72x")]
    "g.723/5",
    #[cfg(feature = "oki")]
    "oki",
    #[cfg(feature = "oki")]
    "vox",
];

/// Set up logging and the global registry
///
/// Installs a `tracing` subscriber if none is set and populates the global
/// registry. Safe to call multiple times; lookups also work without it.
///
/// # Errors
///
/// Returns an error if the global registry comes up empty.
pub fn init() -> Result<()> {
    // An application subscriber takes precedence
    let _ = tracing_subscriber::fmt::try_init();

    let registry = CodecRegistry::global();
    if registry.is_empty() && !SUPPORTED_CODECS.is_empty() {
        return Err(CodecError::internal_error("global registry has no built-in codecs"));
    }

    tracing::info!("Voicecodec-Core v{} initialized", VERSION);
    tracing::info!("Registered codecs: {:?}", registry);

    Ok(())
}

/// Version and codec summary
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        supported_codecs: SUPPORTED_CODECS.to_vec(),
        registered: CodecRegistry::global().len(),
    }
}

/// Summary returned by [`info`]
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    /// Crate version
    pub version: &'static str,
    /// Names of the built-in codecs
    pub supported_codecs: Vec<&'static str>,
    /// Prototypes currently in the global registry
    pub registered: usize,
}
