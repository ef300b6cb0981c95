//! G.72x ADPCM Sample Coder
//!
//! Per-sample encode and decode for any supported codeword width. Both
//! directions run the same reconstruction path, so an encoder and a decoder
//! fed the same codewords track each other exactly. The one exception is the
//! G.721 encoder, whose wider signal estimate can part from the decoder's on
//! near-clipping input.

use super::reference::{
    quantize, reconstruct, signal_estimate, signal_estimate_wide, step_size, update,
};
use super::state::AdpcmState;
use super::tables::G72xVariant;

/// Reconstruct the signal for `code` and adapt `state`
///
/// Returns the 14-bit reconstructed signal.
fn reconstruct_and_adapt(
    code: usize,
    sez: i32,
    se: i32,
    y: i32,
    state: &mut AdpcmState,
    variant: &G72xVariant,
) -> i16 {
    let sign = code as u8 & variant.sign_bit() != 0;
    let dq = reconstruct(sign, variant.dqln[code], y);

    let sr = if dq < 0 {
        se - (dq & variant.dq_mask) as i32
    } else {
        se + dq as i32
    } as i16;
    let dqsez = (sr as i32 + sez - se) as i16;

    update(
        state,
        variant.bits,
        y,
        variant.wi[code],
        variant.fi[code],
        dq,
        sr,
        dqsez,
    );
    sr
}

/// Encode one 16-bit linear sample to a codeword
pub fn encode_sample(sample: i16, state: &mut AdpcmState, variant: &G72xVariant) -> u8 {
    // 14-bit input
    let sl = (sample >> 2) as i32;

    let (sez, se) = if variant.wide_encoder_estimate {
        signal_estimate_wide(state)
    } else {
        signal_estimate(state)
    };
    let d = (sl - se) as i16 as i32;
    let y = step_size(state);
    let mut code = quantize(d, y, variant.qtab);

    // 2-bit coding has no zero code for non-negative differences
    if variant.bits == 2 && code == 3 && d >= 0 {
        code = 0;
    }

    reconstruct_and_adapt(code, sez, se, y, state, variant);
    code as u8
}

/// Decode one codeword to a 16-bit linear sample
pub fn decode_sample(code: u8, state: &mut AdpcmState, variant: &G72xVariant) -> i16 {
    let code = (code & variant.code_mask()) as usize;

    let (sez, se) = signal_estimate(state);
    let y = step_size(state);
    let sr = reconstruct_and_adapt(code, sez, se, y, state, variant);

    ((sr as i32) << 2) as i16
}
