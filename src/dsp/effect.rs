//! Effect trait definition
//!
//! Every edit is a pure transformation from one snapshot to a new one. The
//! input is never modified, which is what lets the editor keep the previous
//! snapshot on the undo stack.

use crate::engine::AudioBuffer;
use crate::error::Result;

/// Base trait for all editing effects
pub trait Effect {
    /// Produce a new buffer from `input`
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer>;

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Human-readable description used in the history list
    fn label(&self) -> String;
}

/// Scale a sample by a linear gain, rounding to the nearest integer
#[inline]
pub(crate) fn scale_sample(sample: i32, gain: f64) -> i64 {
    (sample as f64 * gain).round() as i64
}
