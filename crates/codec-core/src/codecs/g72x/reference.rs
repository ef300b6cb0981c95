//! G.72x Fixed-Point Reference Functions
//!
//! Quantization, reconstruction, prediction and adaptation arithmetic shared by
//! every codeword width. Intermediates are carried in `i32` and narrowed to
//! `i16` exactly where the reference arithmetic truncates to 16 bits.

use super::state::AdpcmState;
use super::tables::POWER2;

/// Index of the first table entry greater than `val`, or the table length
pub fn quan(val: i32, table: &[i16]) -> usize {
    table
        .iter()
        .position(|&level| val < level as i32)
        .unwrap_or(table.len())
}

/// Multiply a predictor coefficient by a float-format history value
pub fn fmult(an: i16, srn: i16) -> i16 {
    let an = an as i32;
    let srn = srn as i32;

    let anmag = if an > 0 { an } else { (-an) & 0x1FFF };
    let anexp = quan(anmag, &POWER2) as i32 - 6;
    let anmant = if anmag == 0 {
        32
    } else if anexp >= 0 {
        anmag >> anexp
    } else {
        anmag << -anexp
    };

    let wanexp = anexp + ((srn >> 6) & 0xF) - 13;
    let wanmant = (anmant * (srn & 0o77) + 0x30) >> 4;
    let retval = if wanexp >= 0 {
        (wanmant << wanexp) & 0x7FFF
    } else {
        wanmant >> -wanexp
    };

    if (an ^ srn) < 0 {
        -retval as i16
    } else {
        retval as i16
    }
}

/// Quantize difference `d` against step size `y`
///
/// Returns the codeword index. Negative differences map to the upper half of
/// the code space, and a zero magnitude index maps to the all-ones code.
pub fn quantize(d: i32, y: i32, table: &[i16]) -> usize {
    let dqm = d.abs();
    let exp = quan(dqm >> 1, &POWER2) as i32;
    let mant = ((dqm << 7) >> exp) & 0x7F;
    let dl = (exp << 7) + mant;
    let dln = dl - (y >> 2);
    let i = quan(dln, table);

    let size = table.len();
    if d < 0 {
        (size << 1) + 1 - i
    } else if i == 0 {
        (size << 1) + 1
    } else {
        i
    }
}

/// Convert a log-domain level back to a sign-magnitude quantized difference
pub fn reconstruct(sign: bool, dqln: i16, y: i32) -> i16 {
    let dql = dqln as i32 + (y >> 2);

    if dql < 0 {
        return if sign { i16::MIN } else { 0 };
    }

    let dex = (dql >> 7) & 15;
    let dqt = 128 + (dql & 127);
    let dq = (dqt << 7) >> (14 - dex);
    if sign {
        (dq - 0x8000) as i16
    } else {
        dq as i16
    }
}

/// Zero predictor: weighted sum over the six quantized differences
pub fn predictor_zero(state: &AdpcmState) -> i32 {
    state
        .b
        .iter()
        .zip(state.dq.iter())
        .map(|(&b, &dq)| fmult(b >> 2, dq) as i32)
        .sum()
}

/// Pole predictor: weighted sum over the two reconstructed signals
pub fn predictor_pole(state: &AdpcmState) -> i32 {
    fmult(state.a[1] >> 2, state.sr[1]) as i32 + fmult(state.a[0] >> 2, state.sr[0]) as i32
}

/// Signal estimate: returns `(sez, se)`, the zero-only and full estimates
///
/// The zero predictor sum is narrowed to 16 bits before halving, and so is
/// its sum with the pole predictor.
pub fn signal_estimate(state: &AdpcmState) -> (i32, i32) {
    let sezi = predictor_zero(state) as i16 as i32;
    let sei = (sezi + predictor_pole(state)) as i16;
    (sezi >> 1, (sei >> 1) as i32)
}

/// Signal estimate that halves the full sum before narrowing it
///
/// Used by the G.721 encoder, whose estimate keeps one more bit of headroom
/// than the decoder's.
pub fn signal_estimate_wide(state: &AdpcmState) -> (i32, i32) {
    let sezi = predictor_zero(state) as i16 as i32;
    let se = ((sezi + predictor_pole(state)) >> 1) as i16;
    (sezi >> 1, se as i32)
}

/// Quantizer step size, mixing the fast and slow scale factors by `ap`
pub fn step_size(state: &AdpcmState) -> i32 {
    if state.ap >= 256 {
        return state.yu as i32;
    }

    let mut y = state.yl >> 6;
    let dif = state.yu as i32 - y;
    let al = (state.ap >> 2) as i32;
    if dif > 0 {
        y += (dif * al) >> 6;
    } else if dif < 0 {
        y += (dif * al + 0x3F) >> 6;
    }
    y
}

/// Float-like history encoding of a signed magnitude
fn float_history(magnitude: i32, negative: bool) -> i16 {
    if magnitude == 0 {
        return if negative { 0xFC20u16 as i16 } else { 0x20 };
    }
    let exp = quan(magnitude, &POWER2) as i32;
    let value = (exp << 6) + ((magnitude << 6) >> exp);
    if negative {
        (value - 0x400) as i16
    } else {
        value as i16
    }
}

/// Adapt the predictor and quantizer after one sample
///
/// `y` is the step size the sample was coded with, `wi`/`fi` the table
/// entries of its codeword, `dq` the quantized difference, `sr` the
/// reconstructed signal and `dqsez` the partially reconstructed signal.
#[allow(clippy::too_many_arguments)]
pub fn update(
    state: &mut AdpcmState,
    bits: u32,
    y: i32,
    wi: i32,
    fi: i16,
    dq: i16,
    sr: i16,
    dqsez: i16,
) {
    let pk0: i16 = i16::from(dqsez < 0);
    let mag = dq as i32 & 0x7FFF;

    // Transition detector
    let ylint = state.yl >> 15;
    let ylfrac = (state.yl >> 10) & 0x1F;
    let thr2 = if ylint > 9 {
        31 << 10
    } else {
        (32 + ylfrac) << ylint
    };
    let dqthr = (thr2 + (thr2 >> 1)) >> 1;
    let tr = state.td != 0 && mag > dqthr;

    // Quantizer scale factors
    let yu = (y + ((wi - y) >> 5)).clamp(AdpcmState::YU_MIN as i32, AdpcmState::YU_MAX as i32);
    state.yu = yu as i16;
    state.yl += yu + ((-state.yl) >> 6);

    let mut a2p = 0;
    if tr {
        state.a = [0; 2];
        state.b = [0; 6];
    } else {
        let pks1 = pk0 ^ state.pk[0];

        a2p = state.a[1] as i32 - ((state.a[1] as i32) >> 7);
        if dqsez != 0 {
            let fa1 = if pks1 != 0 {
                state.a[0] as i32
            } else {
                -(state.a[0] as i32)
            };
            if fa1 < -8191 {
                a2p -= 0x100;
            } else if fa1 > 8191 {
                a2p += 0xFF;
            } else {
                a2p += fa1 >> 5;
            }

            if pk0 ^ state.pk[1] != 0 {
                if a2p <= -12160 {
                    a2p = -12288;
                } else if a2p >= 12416 {
                    a2p = 12288;
                } else {
                    a2p -= 0x80;
                }
            } else if a2p <= -12416 {
                a2p = -12288;
            } else if a2p >= 12160 {
                a2p = 12288;
            } else {
                a2p += 0x80;
            }
        }
        state.a[1] = a2p as i16;

        let mut a1 = state.a[0] as i32 - ((state.a[0] as i32) >> 8);
        if dqsez != 0 {
            if pks1 == 0 {
                a1 += 192;
            } else {
                a1 -= 192;
            }
        }
        // Stability limit on a1 relative to a2
        let a1ul = 15360 - a2p;
        if a1 < -a1ul {
            a1 = -a1ul;
        } else if a1 > a1ul {
            a1 = a1ul;
        }
        state.a[0] = a1 as i16;

        let leak = if bits == 5 { 9 } else { 8 };
        for (b, &history) in state.b.iter_mut().zip(state.dq.iter()) {
            let mut coefficient = *b as i32;
            coefficient -= coefficient >> leak;
            if mag != 0 {
                if (dq ^ history) >= 0 {
                    coefficient += 128;
                } else {
                    coefficient -= 128;
                }
            }
            *b = coefficient as i16;
        }
    }

    state.dq.copy_within(0..5, 1);
    state.dq[0] = float_history(mag, dq < 0);

    state.sr[1] = state.sr[0];
    state.sr[0] = if sr == i16::MIN {
        0xFC20u16 as i16
    } else {
        float_history((sr as i32).abs(), sr < 0)
    };

    state.pk[1] = state.pk[0];
    state.pk[0] = pk0;

    // Tone detector
    state.td = i16::from(!tr && a2p < -11776);

    // Adaptation speed control
    let fi = fi as i32;
    let dms = state.dms as i32 + ((fi - state.dms as i32) >> 5);
    let dml = state.dml as i32 + (((fi << 2) - state.dml as i32) >> 7);
    state.dms = dms as i16;
    state.dml = dml as i16;

    let ap = state.ap as i32;
    state.ap = if tr {
        256
    } else if y < 1536 || state.td == 1 || ((dms << 2) - dml).abs() >= (dml >> 3) {
        (ap + ((0x200 - ap) >> 4)) as i16
    } else {
        (ap + ((-ap) >> 4)) as i16
    };
}
