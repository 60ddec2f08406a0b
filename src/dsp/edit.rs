//! Structural edits: trim and two-clip mixing

use crate::dsp::effect::Effect;
use crate::engine::AudioBuffer;
use crate::error::{Result, SfxError};

/// Keep only `start_ms..end_ms` of the clip
///
/// `end_ms` past the end of the clip is clamped to the clip length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trim {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Trim {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }
}

impl Effect for Trim {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let len_ms = input.len_ms();
        let end_ms = self.end_ms.min(len_ms);

        if self.start_ms >= end_ms {
            return Err(SfxError::InvalidRange {
                start_ms: self.start_ms,
                end_ms: self.end_ms,
                len_ms,
            });
        }

        let start = input.frames_for_ms(self.start_ms);
        let end = if end_ms == len_ms {
            input.frame_count()
        } else {
            input.frames_for_ms(end_ms)
        };

        Ok(input.slice_frames(start, end))
    }

    fn effect_type(&self) -> &'static str {
        "trim"
    }

    fn label(&self) -> String {
        format!("Trim {}..{} ms", self.start_ms, self.end_ms)
    }
}

/// Mix two clips sample by sample
///
/// `second` is converted to `first`'s format. The shorter clip is padded
/// with silence, so the result lasts as long as the longer input.
pub fn mix(first: &AudioBuffer, second: &AudioBuffer) -> Result<AudioBuffer> {
    let second = second.conform_to(first)?;
    let frames = first.frame_count().max(second.frame_count());
    let first = first.pad_to_frames(frames);
    let second = second.pad_to_frames(frames);

    let samples = first
        .samples()
        .iter()
        .zip(second.samples())
        .map(|(&a, &b)| a as i64 + b as i64)
        .collect();

    Ok(first.with_samples(samples))
}
