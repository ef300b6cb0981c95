//! Input validation utilities for codec operations

use crate::error::{CodecError, Result};
use crate::types::Encoding;

/// Validate that an output buffer can hold `needed` elements
pub fn validate_output_size(needed: usize, actual: usize) -> Result<()> {
    if actual < needed {
        return Err(CodecError::BufferTooSmall { needed, actual });
    }
    Ok(())
}

/// Validate a sample rate for an encoding
///
/// Encodings with an empty rate list accept any non-zero rate.
pub fn validate_sample_rate(encoding: Encoding, rate: u32) -> Result<()> {
    let supported = encoding.supported_rates();
    if rate == 0 || (!supported.is_empty() && !supported.contains(&rate)) {
        return Err(CodecError::InvalidSampleRate {
            rate,
            supported: supported.to_vec(),
        });
    }
    Ok(())
}

/// Validate that `data` holds exactly one encoded frame
pub fn validate_frame_size(data: &[u8], framesize: usize) -> Result<()> {
    if data.len() != framesize {
        return Err(CodecError::InvalidFrameSize {
            expected: framesize,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_size() {
        assert!(validate_output_size(80, 80).is_ok());
        assert!(validate_output_size(0, 0).is_ok());
        assert_eq!(
            validate_output_size(80, 79),
            Err(CodecError::BufferTooSmall { needed: 80, actual: 79 })
        );
    }

    #[test]
    fn test_validate_sample_rate() {
        assert!(validate_sample_rate(Encoding::MuLaw, 8000).is_ok());
        assert!(validate_sample_rate(Encoding::VoxAdpcm, 6000).is_ok());
        assert!(validate_sample_rate(Encoding::Pcm16Mono, 44100).is_ok());

        assert!(matches!(
            validate_sample_rate(Encoding::OkiAdpcm, 11025),
            Err(CodecError::InvalidSampleRate { rate: 11025, .. })
        ));
        assert!(validate_sample_rate(Encoding::Pcm16Mono, 0).is_err());
    }

    #[test]
    fn test_validate_frame_size() {
        assert!(validate_frame_size(&[0u8; 5], 5).is_ok());
        assert_eq!(
            validate_frame_size(&[0u8; 4], 5),
            Err(CodecError::InvalidFrameSize { expected: 5, actual: 4 })
        );
    }
}
