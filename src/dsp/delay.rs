//! Overlay, echo and reverb
//!
//! All time-based effects are built on one primitive: [`overlay`], which
//! sums a second signal into a base signal starting at an offset. Echo is a
//! single delayed copy; reverb is four progressively quieter and later
//! copies. Both play the dry clip first and then the processed one, so the
//! output is twice as long as the input.

use crate::dsp::effect::Effect;
use crate::dsp::gain::apply_gain;
use crate::engine::AudioBuffer;
use crate::error::{Result, SfxError};

/// Number of delayed copies the reverb stacks up
pub const REVERB_TAPS: u32 = 4;

/// Default reverberance when none is given
pub const DEFAULT_REVERBERANCE: u32 = 50;

/// Sum `other` into `base` starting `position_ms` into `base`
///
/// `other` is converted to `base`'s rate, channel count and width first.
/// The result is exactly as long as `base`: whatever part of `other` runs
/// past the end is dropped.
pub fn overlay(base: &AudioBuffer, other: &AudioBuffer, position_ms: u64) -> Result<AudioBuffer> {
    let other = other.conform_to(base)?;
    let channels = base.channels() as usize;
    let offset = base.frames_for_ms(position_ms).saturating_mul(channels);

    let mut samples: Vec<i64> = base.samples().iter().map(|&s| s as i64).collect();
    if offset < samples.len() {
        for (dst, &src) in samples[offset..].iter_mut().zip(other.samples()) {
            *dst += src as i64;
        }
    }

    Ok(base.with_samples(samples))
}

// ============================================================================
// Echo
// ============================================================================

/// The dry clip, then the clip with one delayed copy mixed over itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Echo {
    pub delay_ms: u64,
}

impl Echo {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Effect for Echo {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let wet = overlay(input, input, self.delay_ms)?;
        input.concat(&wet)
    }

    fn effect_type(&self) -> &'static str {
        "echo"
    }

    fn label(&self) -> String {
        format!("Echo {} ms", self.delay_ms)
    }
}

// ============================================================================
// Reverb
// ============================================================================

/// The dry clip, then the clip with four decaying delayed copies
///
/// `reverberance` (0-100) sets both the tap spacing,
/// `(reverberance / 10) * 50` ms, and the per-tap attenuation,
/// `reverberance / 100` dB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reverb {
    pub reverberance: u32,
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new(DEFAULT_REVERBERANCE)
    }
}

impl Reverb {
    pub fn new(reverberance: u32) -> Self {
        Self { reverberance }
    }

    /// Spacing between taps in ms
    pub fn tap_delay_ms(&self) -> u64 {
        (self.reverberance / 10) as u64 * 50
    }

    /// Attenuation added per tap in dB
    pub fn tap_decay_db(&self) -> f64 {
        self.reverberance as f64 / 100.0
    }
}

impl Effect for Reverb {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        if self.reverberance > 100 {
            return Err(SfxError::invalid_param(
                "reverberance",
                self.reverberance,
                "0 to 100",
            ));
        }

        let delay = self.tap_delay_ms();
        let decay = self.tap_decay_db();

        let mut output = input.clone();
        for tap in 1..=REVERB_TAPS {
            let copy = apply_gain(input, -(tap as f64) * decay);
            output = overlay(&output, &copy, delay * tap as u64)?;
        }
        input.concat(&output)
    }

    fn effect_type(&self) -> &'static str {
        "reverb"
    }

    fn label(&self) -> String {
        format!("Reverb {}", self.reverberance)
    }
}
