//! Gain and fades
//!
//! Volume changes in dB and linear-amplitude fades between silence
//! (-120 dB) and unity.

use crate::dsp::effect::{scale_sample, Effect};
use crate::engine::buffer::{db_to_linear, SILENCE_DB};
use crate::engine::AudioBuffer;
use crate::error::{Result, SfxError};

// ============================================================================
// Volume
// ============================================================================

/// Change loudness by a fixed number of decibels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub gain_db: f64,
}

impl Volume {
    pub fn new(gain_db: f64) -> Self {
        Self { gain_db }
    }
}

impl Effect for Volume {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        if !self.gain_db.is_finite() {
            return Err(SfxError::invalid_param(
                "gain_db",
                self.gain_db,
                "a finite dB value",
            ));
        }
        Ok(apply_gain(input, self.gain_db))
    }

    fn effect_type(&self) -> &'static str {
        "volume"
    }

    fn label(&self) -> String {
        format!("Volume {:+.1} dB", self.gain_db)
    }
}

/// Apply a constant gain in dB, clipping at the sample width
pub fn apply_gain(input: &AudioBuffer, gain_db: f64) -> AudioBuffer {
    let gain = db_to_linear(gain_db);
    let samples = input
        .samples()
        .iter()
        .map(|&s| scale_sample(s, gain))
        .collect();
    input.with_samples(samples)
}

// ============================================================================
// Fades
// ============================================================================

/// Fade from silence to full level over the first `duration_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeIn {
    pub duration_ms: u64,
}

impl FadeIn {
    pub fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }

    /// Where the fade ends on the clip, in ms
    pub fn end_ms(&self, input: &AudioBuffer) -> u64 {
        self.duration_ms.min(input.len_ms())
    }
}

impl Effect for FadeIn {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let frames = input.frames_for_ms(self.duration_ms).min(input.frame_count());
        Ok(fade(input, 0, frames, db_to_linear(SILENCE_DB), 1.0))
    }

    fn effect_type(&self) -> &'static str {
        "fade_in"
    }

    fn label(&self) -> String {
        format!("Fade in {} ms", self.duration_ms)
    }
}

/// Fade from full level to silence over the last `duration_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeOut {
    pub duration_ms: u64,
}

impl FadeOut {
    pub fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }

    /// The faded span `(start_ms, end_ms)` on the clip
    pub fn span_ms(&self, input: &AudioBuffer) -> (u64, u64) {
        let len = input.len_ms();
        (len.saturating_sub(self.duration_ms), len)
    }
}

impl Effect for FadeOut {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let total = input.frame_count();
        let frames = input.frames_for_ms(self.duration_ms).min(total);
        Ok(fade(input, total - frames, total, 1.0, db_to_linear(SILENCE_DB)))
    }

    fn effect_type(&self) -> &'static str {
        "fade_out"
    }

    fn label(&self) -> String {
        format!("Fade out {} ms", self.duration_ms)
    }
}

/// Ramp linear gain from `from` to `to` across frames `start..end`
///
/// Frames outside the span are copied unchanged.
fn fade(input: &AudioBuffer, start: usize, end: usize, from: f64, to: f64) -> AudioBuffer {
    let channels = input.channels() as usize;
    let span = end.saturating_sub(start);

    let samples = input
        .samples()
        .chunks_exact(channels)
        .enumerate()
        .flat_map(|(frame, values)| {
            let gain = if frame >= start && frame < end {
                from + (to - from) * ((frame - start) as f64 / span as f64)
            } else {
                1.0
            };
            values.iter().map(move |&s| scale_sample(s, gain))
        })
        .collect();

    input.with_samples(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: i32, duration_ms: u64) -> AudioBuffer {
        let frames = duration_ms as usize;
        AudioBuffer::new(vec![value; frames * 2], 1000, 2, 2).unwrap()
    }

    #[test]
    fn test_volume_gain() {
        let buffer = constant(10000, 10);
        let louder = Volume::new(6.0206).apply(&buffer).unwrap();
        assert!(louder.samples().iter().all(|&s| (s - 20000).abs() <= 1));

        let quieter = Volume::new(-20.0).apply(&buffer).unwrap();
        assert!(quieter.samples().iter().all(|&s| s == 1000));
    }

    #[test]
    fn test_volume_clips() {
        let buffer = constant(30000, 10);
        let louder = Volume::new(12.0).apply(&buffer).unwrap();
        assert!(louder.samples().iter().all(|&s| s == i16::MAX as i32));
    }

    #[test]
    fn test_volume_rejects_nan() {
        assert!(Volume::new(f64::NAN).apply(&constant(1, 1)).is_err());
    }

    #[test]
    fn test_fade_in_ramps_up() {
        let buffer = constant(10000, 100);
        let faded = FadeIn::new(50).apply(&buffer).unwrap();

        assert_eq!(faded.frame_count(), buffer.frame_count());
        assert_eq!(faded.samples()[0], 0);
        assert!(faded.samples()[50] > faded.samples()[20]);
        // Halfway through the fade is half level
        assert!((faded.samples()[50] - 5000).abs() <= 1);
        // Past the fade the signal is untouched
        assert_eq!(faded.samples()[100], 10000);
        assert_eq!(faded.samples()[199], 10000);
    }

    #[test]
    fn test_fade_out_ramps_down() {
        let buffer = constant(10000, 100);
        let faded = FadeOut::new(40).apply(&buffer).unwrap();

        assert_eq!(faded.samples()[0], 10000);
        assert_eq!(faded.samples()[2 * 59], 10000);
        assert_eq!(faded.samples()[2 * 60], 10000);
        assert!(faded.samples()[2 * 99] < 300);
        assert_eq!(FadeOut::new(40).span_ms(&buffer), (60, 100));
    }

    #[test]
    fn test_fade_longer_than_clip_is_clamped() {
        let buffer = constant(10000, 20);
        let faded = FadeIn::new(5000).apply(&buffer).unwrap();
        assert_eq!(faded.frame_count(), 20);
        assert_eq!(FadeIn::new(5000).end_ms(&buffer), 20);

        let faded_out = FadeOut::new(5000).apply(&buffer).unwrap();
        assert_eq!(faded_out.samples()[0], 10000);
        assert_eq!(FadeOut::new(5000).span_ms(&buffer), (0, 20));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Volume::new(-3.0).label(), "Volume -3.0 dB");
        assert_eq!(FadeIn::new(2000).label(), "Fade in 2000 ms");
        assert_eq!(FadeOut::new(2000).effect_type(), "fade_out");
    }
}
