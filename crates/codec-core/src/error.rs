//! Errors reported by codec construction, lookup and configuration
//!
//! Errors are reserved for caller misuse and configuration problems. Streaming
//! calls never fail on partial frames: they report the batch-aligned count they
//! actually processed, and the ring buffer never errors at all.

#![allow(missing_docs)]

use std::fmt;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CodecError>;

/// Everything that can go wrong outside the streaming paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Descriptor or constructor arguments do not describe a usable codec
    #[error("bad codec configuration: {details}")]
    InvalidConfig { details: String },

    /// Encoding has no registered or built-in implementation
    #[error("encoding {encoding} is not supported here")]
    UnsupportedEncoding { encoding: String },

    /// Format string could not be interpreted
    #[error("unrecognized format: {details}")]
    InvalidFormat { details: String },

    /// Data is not exactly one encoded frame
    #[error("frame is {actual} octets, codec frames are {expected}")]
    InvalidFrameSize { expected: usize, actual: usize },

    /// Rate the encoding cannot run at
    #[error("{rate}Hz is not a supported rate (supported: {supported:?})")]
    InvalidSampleRate { rate: u32, supported: Vec<u32> },

    /// Bitrate does not match the descriptor framing
    #[error("bitrate {bitrate}bps disagrees with the framing ({expected}bps)")]
    InvalidBitrate { bitrate: u32, expected: u32 },

    /// Caller-supplied output buffer is too short
    #[error("output holds {actual} elements, {needed} required")]
    BufferTooSmall { needed: usize, actual: usize },

    /// No prototype matched a lookup
    #[error("no codec registered for {name}")]
    CodecNotFound { name: String },

    /// A prototype with the same name is already registered
    #[error("a codec named {name} is already registered")]
    DuplicateCodec { name: String },

    /// A linked frame codec library failed
    #[error("{library} frame codec failed: {error}")]
    ExternalLibraryError { library: String, error: String },

    /// Broken internal invariant
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl CodecError {
    /// [`CodecError::InvalidConfig`] with `details`
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// [`CodecError::UnsupportedEncoding`] for an encoding name
    pub fn unsupported_encoding(encoding: impl Into<String>) -> Self {
        Self::UnsupportedEncoding {
            encoding: encoding.into(),
        }
    }

    /// [`CodecError::InvalidFormat`] with `details`
    pub fn invalid_format(details: impl Into<String>) -> Self {
        Self::InvalidFormat {
            details: details.into(),
        }
    }

    /// [`CodecError::CodecNotFound`] for a lookup key
    pub fn codec_not_found(name: impl Into<String>) -> Self {
        Self::CodecNotFound { name: name.into() }
    }

    /// [`CodecError::ExternalLibraryError`] raised by `library`
    pub fn external(library: impl Into<String>, error: impl Into<String>) -> Self {
        Self::ExternalLibraryError {
            library: library.into(),
            error: error.into(),
        }
    }

    /// [`CodecError::InternalError`] with `message`
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// True when retrying with different input can succeed
    ///
    /// Configuration and registry errors need a different codec or
    /// descriptor; buffer sizing and library failures are per call.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfig { .. }
            | Self::UnsupportedEncoding { .. }
            | Self::InvalidFormat { .. }
            | Self::InvalidSampleRate { .. }
            | Self::InvalidBitrate { .. }
            | Self::CodecNotFound { .. }
            | Self::DuplicateCodec { .. }
            | Self::InternalError { .. } => false,

            Self::InvalidFrameSize { .. }
            | Self::BufferTooSmall { .. }
            | Self::ExternalLibraryError { .. } => true,
        }
    }

    /// Coarse classification for logging and metrics
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. }
            | Self::UnsupportedEncoding { .. }
            | Self::InvalidFormat { .. }
            | Self::InvalidSampleRate { .. }
            | Self::InvalidBitrate { .. } => ErrorCategory::Configuration,

            Self::CodecNotFound { .. } | Self::DuplicateCodec { .. } => ErrorCategory::Registry,

            Self::InvalidFrameSize { .. } => ErrorCategory::Processing,

            Self::BufferTooSmall { .. } => ErrorCategory::Memory,

            Self::ExternalLibraryError { .. } => ErrorCategory::External,

            Self::InternalError { .. } => ErrorCategory::Internal,
        }
    }
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Descriptor, encoding, rate or bitrate problems
    Configuration,
    /// Codec registration and lookup errors
    Registry,
    /// Frame-level problems
    Processing,
    /// Buffer sizing errors
    Memory,
    /// Failures inside a linked frame codec
    External,
    /// Bugs in this crate
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Registry => "registry",
            Self::Processing => "processing",
            Self::Memory => "memory",
            Self::External => "external",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_build_matching_variants() {
        let err = CodecError::invalid_config("ring buffer capacity must be non-zero");
        assert!(matches!(err, CodecError::InvalidConfig { .. }));
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            CodecError::unsupported_encoding("gsm").category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_error_recoverability() {
        let recoverable = CodecError::BufferTooSmall {
            needed: 10,
            actual: 4,
        };
        assert!(recoverable.is_recoverable());

        assert!(!CodecError::DuplicateCodec { name: "g.721".into() }.is_recoverable());
        assert!(!CodecError::codec_not_found("g.729").is_recoverable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            CodecError::codec_not_found("speex").category(),
            ErrorCategory::Registry
        );
        assert_eq!(
            CodecError::external("gsm", "bad frame").category(),
            ErrorCategory::External
        );
        assert_eq!(
            CodecError::BufferTooSmall { needed: 100, actual: 50 }.category(),
            ErrorCategory::Memory
        );
    }

    #[test]
    fn test_error_display() {
        let err = CodecError::InvalidBitrate {
            bitrate: 24000,
            expected: 32000,
        };
        assert_eq!(
            err.to_string(),
            "bitrate 24000bps disagrees with the framing (32000bps)"
        );
        assert_eq!(ErrorCategory::Registry.to_string(), "registry");
    }
}
