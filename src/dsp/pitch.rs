//! Pitch shift by resampling
//!
//! Reinterprets the samples at a rate scaled by `2^(semitones/12)` and
//! resamples the result back to 44.1 kHz. Pitch and duration change
//! together, like speeding up or slowing down a tape.

use crate::dsp::effect::Effect;
use crate::engine::buffer::DEFAULT_SAMPLE_RATE;
use crate::engine::AudioBuffer;
use crate::error::{Result, SfxError};

/// Largest shift either way, four octaves
pub const MAX_PITCH_SEMITONES: f64 = 48.0;

/// Shift pitch by a number of semitones (negative shifts down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchShift {
    pub semitones: f64,
}

impl PitchShift {
    pub fn new(semitones: f64) -> Self {
        Self { semitones }
    }

    pub fn up(semitones: u32) -> Self {
        Self::new(semitones as f64)
    }

    pub fn down(semitones: u32) -> Self {
        Self::new(-(semitones as f64))
    }

    /// Rate the original samples are reinterpreted at
    pub fn shifted_rate(&self, sample_rate: u32) -> u32 {
        (sample_rate as f64 * 2.0_f64.powf(self.semitones / 12.0)) as u32
    }
}

impl Effect for PitchShift {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        if !self.semitones.is_finite() || self.semitones.abs() > MAX_PITCH_SEMITONES {
            return Err(SfxError::invalid_param(
                "semitones",
                self.semitones,
                "-48 to 48 semitones",
            ));
        }

        let shifted_rate = self.shifted_rate(input.sample_rate());
        if shifted_rate == 0 {
            return Err(SfxError::invalid_param(
                "semitones",
                self.semitones,
                "a shift that keeps the sample rate above 0 Hz",
            ));
        }

        input
            .with_frame_rate_override(shifted_rate)?
            .set_frame_rate(DEFAULT_SAMPLE_RATE)
    }

    fn effect_type(&self) -> &'static str {
        "pitch_shift"
    }

    fn label(&self) -> String {
        if self.semitones >= 0.0 {
            format!("Pitch up {} st", self.semitones)
        } else {
            format!("Pitch down {} st", -self.semitones)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_octave_up_halves_duration() {
        let input = AudioBuffer::silent(1000, 44100, 1, 2).unwrap();
        let shifted = PitchShift::up(12).apply(&input).unwrap();
        assert_eq!(shifted.sample_rate(), 44100);
        assert_eq!(shifted.len_ms(), 500);
    }

    #[test]
    fn test_octave_down_doubles_duration() {
        let input = AudioBuffer::silent(1000, 44100, 2, 2).unwrap();
        let shifted = PitchShift::down(12).apply(&input).unwrap();
        assert_eq!(shifted.len_ms(), 2000);
        assert_eq!(shifted.channels(), 2);
    }

    #[test]
    fn test_one_semitone_rate() {
        let rate = PitchShift::up(1).shifted_rate(44100);
        assert_eq!(rate, 46722);
        let down = PitchShift::down(1).shifted_rate(44100);
        assert_eq!(down, 41624);
    }

    #[test]
    fn test_output_is_resampled_to_44100() {
        let input = AudioBuffer::silent(500, 22050, 1, 2).unwrap();
        let shifted = PitchShift::new(0.0).apply(&input).unwrap();
        assert_eq!(shifted.sample_rate(), 44100);
        assert_relative_eq!(shifted.duration_secs(), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_rejects_shift_beyond_four_octaves() {
        let input = AudioBuffer::new(vec![0; 100], 44100, 1, 2).unwrap();
        assert!(PitchShift::down(48).apply(&input).is_ok());
        for shift in [PitchShift::down(49), PitchShift::up(49), PitchShift::down(u32::MAX)] {
            assert!(matches!(
                shift.apply(&input),
                Err(SfxError::InvalidParameter { .. })
            ));
        }
        assert!(PitchShift::new(f64::NAN).apply(&input).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PitchShift::up(1).label(), "Pitch up 1 st");
        assert_eq!(PitchShift::down(2).label(), "Pitch down 2 st");
    }
}
