//! G.72x ADPCM State Management
//!
//! Adaptive predictor and quantizer state shared by the G.721 and G.723
//! variants. An encoder and a decoder each own one of these; they are never
//! shared between directions.

/// Adaptive state for one direction of one ADPCM stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdpcmState {
    /// Locked (slow) quantizer scale factor
    pub yl: i32,
    /// Unlocked (fast) quantizer scale factor
    pub yu: i16,
    /// Short-term energy estimate
    pub dms: i16,
    /// Long-term energy estimate
    pub dml: i16,
    /// Linear weighting coefficient of `yl` and `yu`
    pub ap: i16,
    /// Pole predictor coefficients
    pub a: [i16; 2],
    /// Zero predictor coefficients
    pub b: [i16; 6],
    /// Signs of previous partially reconstructed signals
    pub pk: [i16; 2],
    /// Previous quantized differences, in the float-like history format
    pub dq: [i16; 6],
    /// Previous reconstructed signals, in the float-like history format
    pub sr: [i16; 2],
    /// Tone detector flag
    pub td: i16,
}

impl AdpcmState {
    /// Initial yl
    pub const YL_INIT: i32 = 34816;
    /// Initial yu, also its lower bound
    pub const YU_MIN: i16 = 544;
    /// Upper bound on yu
    pub const YU_MAX: i16 = 5120;

    /// Create a state with the standard initial values
    pub fn new() -> Self {
        Self {
            yl: Self::YL_INIT,
            yu: Self::YU_MIN,
            dms: 0,
            dml: 0,
            ap: 0,
            a: [0; 2],
            b: [0; 6],
            pk: [0; 2],
            dq: [32; 6],
            sr: [32; 2],
            td: 0,
        }
    }

    /// Reset to the initial values
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for AdpcmState {
    fn default() -> Self {
        Self::new()
    }
}
