//! G.721 and G.723 ADPCM
//!
//! Adaptive differential PCM at 16, 24, 32 and 40 kbit/s. All four rates share
//! one adaptive predictor and quantizer and differ only in codeword width,
//! tables and framing:
//!
//! | Encoding | Bits | Samples per batch | Octets per batch |
//! |----------|------|-------------------|------------------|
//! | G.721    | 4    | 2                 | 1                |
//! | G.723/2  | 2    | 4                 | 1                |
//! | G.723/3  | 3    | 8                 | 3                |
//! | G.723/5  | 5    | 8                 | 5                |
//!
//! # Architecture
//!
//! - `reference`: fixed-point quantize/reconstruct/predict/adapt arithmetic
//! - `adpcm`: per-sample encode and decode
//! - `packing`: LSB-first codeword packing
//! - `tables`: per-variant tables
//! - `state`: adaptive state
//! - `codec`: the [`AudioCodec`](crate::types::AudioCodec) worker

pub mod adpcm;
pub mod codec;
pub mod packing;
pub mod reference;
pub mod state;
pub mod tables;

#[cfg(test)]
mod tests;

pub use codec::G72xCodec;
pub use state::AdpcmState;
pub use tables::G72xVariant;
