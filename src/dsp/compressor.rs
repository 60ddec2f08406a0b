//! Compressor effect
//!
//! A feed-forward RMS compressor. For every frame the RMS of the preceding
//! attack window is compared with the threshold; while it sits above, the
//! attenuation ramps toward `(1 - 1/ratio) * dB_over_threshold` within the
//! attack time, and once the level falls back below it decays to zero over
//! the release time.

use crate::dsp::effect::{scale_sample, Effect};
use crate::engine::buffer::{db_to_linear, frames_for_ms, linear_to_db};
use crate::engine::AudioBuffer;
use crate::error::{Result, SfxError};
use serde::{Deserialize, Serialize};

/// Compressor parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorParams {
    /// Threshold level in dBFS
    pub threshold_db: f64,
    /// Compression ratio (4.0 means 4:1)
    pub ratio: f64,
    /// Attack time in milliseconds, also the RMS look-back window
    pub attack_ms: f64,
    /// Release time in milliseconds
    pub release_ms: f64,
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            threshold_db: -20.0,
            ratio: 4.0,
            attack_ms: 5.0,
            release_ms: 50.0,
        }
    }
}

impl CompressorParams {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_db.is_finite() || self.threshold_db > 0.0 {
            return Err(SfxError::invalid_param(
                "threshold_db",
                self.threshold_db,
                "a dBFS level at or below 0",
            ));
        }
        if !self.ratio.is_finite() || self.ratio < 1.0 {
            return Err(SfxError::invalid_param("ratio", self.ratio, "1.0 or greater"));
        }
        if !self.attack_ms.is_finite() || self.attack_ms <= 0.0 {
            return Err(SfxError::invalid_param(
                "attack_ms",
                self.attack_ms,
                "a positive number of ms",
            ));
        }
        if !self.release_ms.is_finite() || self.release_ms <= 0.0 {
            return Err(SfxError::invalid_param(
                "release_ms",
                self.release_ms,
                "a positive number of ms",
            ));
        }
        Ok(())
    }
}

/// Compressor dynamics processor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Compressor {
    params: CompressorParams,
}

impl Compressor {
    /// Create a compressor with default attack and release times
    pub fn new(threshold_db: f64, ratio: f64) -> Self {
        Self::with_params(CompressorParams {
            threshold_db,
            ratio,
            ..CompressorParams::default()
        })
    }

    pub fn with_params(params: CompressorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CompressorParams {
        &self.params
    }

    /// Target attenuation in dB for a window RMS against the threshold RMS
    fn max_attenuation_db(&self, rms: f64, threshold_rms: f64) -> f64 {
        if rms <= 0.0 {
            return 0.0;
        }
        let over = linear_to_db(rms / threshold_rms).max(0.0);
        (1.0 - 1.0 / self.params.ratio) * over
    }
}

impl Effect for Compressor {
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        self.params.validate()?;

        let channels = input.channels() as usize;
        let rate = input.sample_rate();
        let threshold_rms = input.max_possible_amplitude() * db_to_linear(self.params.threshold_db);
        let look_frames = frames_for_ms(self.params.attack_ms as u64, rate).max(1);
        let attack_frames = (rate as f64 * self.params.attack_ms / 1000.0).max(1.0);
        let release_frames = (rate as f64 * self.params.release_ms / 1000.0).max(1.0);

        let samples = input.samples();
        let mut output = Vec::with_capacity(samples.len());

        // Running sum of squares over the look-back window of whole frames
        let mut window_sq = 0.0_f64;
        let mut attenuation = 0.0_f64;
        let mut release_step = 0.0_f64;

        for (i, frame) in samples.chunks_exact(channels).enumerate() {
            let window_start = i.saturating_sub(look_frames);
            let window_len = (i - window_start) * channels;
            let rms = if window_len == 0 {
                0.0
            } else {
                (window_sq.max(0.0) / window_len as f64).sqrt()
            };

            let max_attenuation = self.max_attenuation_db(rms, threshold_rms);
            if rms > threshold_rms && attenuation <= max_attenuation {
                attenuation = (attenuation + max_attenuation / attack_frames).min(max_attenuation);
                release_step = max_attenuation / release_frames;
            } else {
                attenuation = (attenuation - release_step).max(0.0);
            }

            if attenuation > 0.0 {
                let gain = db_to_linear(-attenuation);
                output.extend(frame.iter().map(|&s| scale_sample(s, gain)));
            } else {
                output.extend(frame.iter().map(|&s| s as i64));
            }

            window_sq += frame.iter().map(|&s| (s as f64).powi(2)).sum::<f64>();
            if i + 1 > look_frames {
                let leaving = &samples[(i - look_frames) * channels..(i - look_frames + 1) * channels];
                window_sq -= leaving.iter().map(|&s| (s as f64).powi(2)).sum::<f64>();
            }
        }

        Ok(input.with_samples(output))
    }

    fn effect_type(&self) -> &'static str {
        "compressor"
    }

    fn label(&self) -> String {
        format!(
            "Compress {:.1} dB {}:1",
            self.params.threshold_db, self.params.ratio
        )
    }
}
