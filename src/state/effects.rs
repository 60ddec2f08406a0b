//! Effect overlay records
//!
//! Lightweight markers describing where effects were applied, used only to
//! draw shaded regions over the waveform. They never feed back into the
//! audio and undo does not rewind them.

use serde::{Deserialize, Serialize};

/// One applied effect, in clip milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectRecord {
    FadeIn { end_ms: u64 },
    FadeOut { start_ms: u64, end_ms: u64 },
    Echo { delay_ms: u64 },
    Reverb { reverberance: u32 },
}

impl EffectRecord {
    /// Region shaded on the waveform, `(start_ms, end_ms)`
    ///
    /// Echo shades the span up to its delay and reverb the span up to its
    /// reverberance value, as the plot has always drawn them.
    pub fn span_ms(&self) -> (u64, u64) {
        match *self {
            EffectRecord::FadeIn { end_ms } => (0, end_ms),
            EffectRecord::FadeOut { start_ms, end_ms } => (start_ms, end_ms),
            EffectRecord::Echo { delay_ms } => (0, delay_ms),
            EffectRecord::Reverb { reverberance } => (0, reverberance as u64),
        }
    }

    /// Short identifier, matching the effect's `effect_type`
    pub fn kind(&self) -> &'static str {
        match self {
            EffectRecord::FadeIn { .. } => "fade_in",
            EffectRecord::FadeOut { .. } => "fade_out",
            EffectRecord::Echo { .. } => "echo",
            EffectRecord::Reverb { .. } => "reverb",
        }
    }

    /// Single character used by the text plot
    pub fn marker(&self) -> char {
        match self {
            EffectRecord::FadeIn { .. } | EffectRecord::FadeOut { .. } => 'f',
            EffectRecord::Echo { .. } => 'e',
            EffectRecord::Reverb { .. } => 'r',
        }
    }
}
