//! Broadband noise floor removal
//!
//! Treats the first second of the clip as background noise, takes its RMS
//! as the floor and pulls every sample's magnitude down by that amount.
//! Anything quieter than the floor becomes silence. This is a crude
//! time-domain gate, not spectral subtraction.

use crate::dsp::effect::Effect;
use crate::engine::buffer::rms_of;
use crate::engine::AudioBuffer;
use crate::error::Result;

/// Length of the leading region used as the noise profile
pub const NOISE_PROFILE_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseReduction {
    pub profile_ms: u64,
}

impl Default for NoiseReduction {
    fn default() -> Self {
        Self {
            profile_ms: NOISE_PROFILE_MS,
        }
    }
}

impl NoiseReduction {
    /// RMS of the profile region, in raw sample units
    pub fn noise_floor(&self, input: &AudioBuffer) -> f64 {
        let frames = input.frames_for_ms(self.profile_ms);
        rms_of(input.slice_frames(0, frames).samples())
    }
}

impl Effect for NoiseReduction {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        let floor = self.noise_floor(input).round() as i64;
        if floor == 0 {
            return Ok(input.clone());
        }

        let samples = input
            .samples()
            .iter()
            .map(|&s| {
                let magnitude = (s as i64).abs() - floor;
                if magnitude <= 0 {
                    0
                } else {
                    magnitude * (s as i64).signum()
                }
            })
            .collect();

        Ok(input.with_samples(samples))
    }

    fn effect_type(&self) -> &'static str {
        "noise_reduction"
    }

    fn label(&self) -> String {
        "Noise reduction".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_from_leading_region() {
        // 1 s of +-100 hiss followed by a 5000 tone, 1 kHz mono
        let mut samples: Vec<i32> = (0..1000).map(|i| if i % 2 == 0 { 100 } else { -100 }).collect();
        samples.extend(std::iter::repeat(5000).take(500));
        let input = AudioBuffer::new(samples, 1000, 1, 2).unwrap();

        assert_eq!(NoiseReduction::default().noise_floor(&input).round(), 100.0);

        let cleaned = NoiseReduction::default().apply(&input).unwrap();
        assert!(cleaned.samples()[..1000].iter().all(|&s| s == 0));
        assert!(cleaned.samples()[1000..].iter().all(|&s| s == 4900));
    }

    #[test]
    fn test_sign_preserved() {
        let input = AudioBuffer::new(vec![10, -10, 300, -300], 1000, 1, 2).unwrap();
        let profile = NoiseReduction { profile_ms: 2 };
        let cleaned = profile.apply(&input).unwrap();
        assert_eq!(cleaned.samples(), &[0, 0, 290, -290]);
    }

    #[test]
    fn test_silent_profile_is_identity() {
        let mut samples = vec![0; 1000];
        samples.extend(vec![1234; 10]);
        let input = AudioBuffer::new(samples, 1000, 1, 2).unwrap();
        let cleaned = NoiseReduction::default().apply(&input).unwrap();
        assert_eq!(cleaned, input);
    }

    #[test]
    fn test_short_clip_uses_whole_clip() {
        let input = AudioBuffer::new(vec![50; 10], 1000, 1, 2).unwrap();
        let cleaned = NoiseReduction::default().apply(&input).unwrap();
        assert!(cleaned.samples().iter().all(|&s| s == 0));
    }
}
