//! G.711 Lookup Tables
//!
//! Decode tables for μ-law and A-law, generated once from the reference
//! expansions. Each table is the exact inverse of the segment encoding: every
//! codeword maps to the midpoint of its quantization interval.
//!
//! The positive half of each table (codes 0x80..=0xFF) doubles as the
//! magnitude table used by the level metrics, since both laws carry the sign
//! in bit 7 alone.

use super::reference::{alaw_expand, ulaw_expand};
use std::sync::LazyLock;

/// μ-law decoding table (8-bit μ-law → 16-bit linear)
static ULAW_DECODE_TABLE: LazyLock<[i16; 256]> = LazyLock::new(|| {
    let mut table = [0i16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = ulaw_expand(code as u8);
    }
    table
});

/// A-law decoding table (8-bit A-law → 16-bit linear)
static ALAW_DECODE_TABLE: LazyLock<[i16; 256]> = LazyLock::new(|| {
    let mut table = [0i16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = alaw_expand(code as u8);
    }
    table
});

/// The full μ-law decode table
pub fn ulaw_table() -> &'static [i16; 256] {
    &ULAW_DECODE_TABLE
}

/// The full A-law decode table
pub fn alaw_table() -> &'static [i16; 256] {
    &ALAW_DECODE_TABLE
}

/// Decode one μ-law octet
#[inline]
pub fn ulaw_to_linear(code: u8) -> i16 {
    ULAW_DECODE_TABLE[code as usize]
}

/// Decode one A-law octet
#[inline]
pub fn alaw_to_linear(code: u8) -> i16 {
    ALAW_DECODE_TABLE[code as usize]
}

/// Magnitude of one μ-law octet
#[inline]
pub fn ulaw_level(code: u8) -> i16 {
    ULAW_DECODE_TABLE[(code | 0x80) as usize]
}

/// Magnitude of one A-law octet
#[inline]
pub fn alaw_level(code: u8) -> i16 {
    ALAW_DECODE_TABLE[(code | 0x80) as usize]
}
