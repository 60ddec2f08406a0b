//! Format conversion between buffers
//!
//! Rate, channel and width conversion used before two buffers are summed
//! and by the pitch shifter. Sample rate conversion uses linear
//! interpolation, which is plenty for short game clips.

use crate::engine::buffer::{frames_for_ms, AudioBuffer};
use crate::error::{Result, SfxError};

impl AudioBuffer {
    /// Convert to a different sample width (bytes), scaling values
    pub fn set_sample_width(&self, sample_width: u16) -> Result<AudioBuffer> {
        if !(1..=4).contains(&sample_width) {
            return Err(SfxError::invalid_param(
                "sample_width",
                sample_width,
                "1, 2, 3 or 4 bytes",
            ));
        }
        if sample_width == self.sample_width() {
            return Ok(self.clone());
        }

        let shift = 8 * (sample_width as i32 - self.sample_width() as i32);
        let samples: Vec<i32> = self
            .samples()
            .iter()
            .map(|&s| {
                if shift >= 0 {
                    ((s as i64) << shift) as i32
                } else {
                    s >> (-shift)
                }
            })
            .collect();

        Ok(AudioBuffer::from_parts_unchecked(
            samples,
            self.sample_rate(),
            self.channels(),
            sample_width,
        ))
    }

    /// Convert to a different channel count
    ///
    /// Mono fans out to every channel; multi-channel folds down to mono by
    /// averaging. Other conversions go through mono.
    pub fn set_channels(&self, channels: u16) -> Result<AudioBuffer> {
        if channels == 0 {
            return Err(SfxError::invalid_param("channels", channels, ">= 1"));
        }
        if channels == self.channels() {
            return Ok(self.clone());
        }

        let src = self.channels() as usize;
        if self.channels() == 1 {
            let samples = self
                .samples()
                .iter()
                .flat_map(|&s| std::iter::repeat(s).take(channels as usize))
                .collect();
            return Ok(AudioBuffer::from_parts_unchecked(
                samples,
                self.sample_rate(),
                channels,
                self.sample_width(),
            ));
        }

        let mono: Vec<i32> = self
            .samples()
            .chunks_exact(src)
            .map(|frame| {
                let sum: i64 = frame.iter().map(|&s| s as i64).sum();
                (sum / src as i64) as i32
            })
            .collect();
        let mono =
            AudioBuffer::from_parts_unchecked(mono, self.sample_rate(), 1, self.sample_width());

        if channels == 1 {
            Ok(mono)
        } else {
            mono.set_channels(channels)
        }
    }

    /// Resample to `sample_rate`, keeping the duration
    pub fn set_frame_rate(&self, sample_rate: u32) -> Result<AudioBuffer> {
        if sample_rate == 0 {
            return Err(SfxError::invalid_param("sample_rate", sample_rate, "> 0"));
        }
        if sample_rate == self.sample_rate() {
            return Ok(self.clone());
        }

        let ratio = sample_rate as f64 / self.sample_rate() as f64;
        let channels = self.channels() as usize;
        let planar = deinterleave(self.samples(), channels);
        let resampled: Vec<Vec<f64>> = planar
            .iter()
            .map(|channel| resample_linear(channel, ratio))
            .collect();

        Ok(AudioBuffer::from_parts_unchecked(
            interleave(&resampled),
            sample_rate,
            self.channels(),
            self.sample_width(),
        ))
    }

    /// Reinterpret the same samples at a different rate
    ///
    /// Playing the result changes both speed and pitch.
    pub fn with_frame_rate_override(&self, sample_rate: u32) -> Result<AudioBuffer> {
        if sample_rate == 0 {
            return Err(SfxError::invalid_param("sample_rate", sample_rate, "> 0"));
        }
        Ok(AudioBuffer::from_parts_unchecked(
            self.samples().to_vec(),
            sample_rate,
            self.channels(),
            self.sample_width(),
        ))
    }

    /// Convert `self` into the format (rate, channels, width) of `target`
    pub fn conform_to(&self, target: &AudioBuffer) -> Result<AudioBuffer> {
        self.set_frame_rate(target.sample_rate())?
            .set_channels(target.channels())?
            .set_sample_width(target.sample_width())
    }

    /// `self` followed by `other`, with `other` conformed to `self`'s format
    pub fn concat(&self, other: &AudioBuffer) -> Result<AudioBuffer> {
        let other = other.conform_to(self)?;
        let mut samples = Vec::with_capacity(self.samples().len() + other.samples().len());
        samples.extend_from_slice(self.samples());
        samples.extend_from_slice(other.samples());
        Ok(AudioBuffer::from_parts_unchecked(
            samples,
            self.sample_rate(),
            self.channels(),
            self.sample_width(),
        ))
    }

    /// Pad with trailing silence up to `duration_ms`
    pub fn pad_to_ms(&self, duration_ms: u64) -> AudioBuffer {
        let frames = frames_for_ms(duration_ms, self.sample_rate());
        self.pad_to_frames(frames)
    }

    pub(crate) fn pad_to_frames(&self, frames: usize) -> AudioBuffer {
        if frames <= self.frame_count() {
            return self.clone();
        }
        let mut samples = self.samples().to_vec();
        samples.resize(frames * self.channels() as usize, 0);
        AudioBuffer::from_parts_unchecked(
            samples,
            self.sample_rate(),
            self.channels(),
            self.sample_width(),
        )
    }
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// De-interleave samples from [L,R,L,R,...] to [[L,L,...], [R,R,...]]
fn deinterleave(samples: &[i32], channels: usize) -> Vec<Vec<f64>> {
    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for (i, sample) in samples.iter().enumerate() {
        result[i % channels].push(*sample as f64);
    }

    result
}

/// Interleave channels from [[L,L,...], [R,R,...]] to [L,R,L,R,...]
fn interleave(channels: &[Vec<f64>]) -> Vec<i32> {
    if channels.is_empty() {
        return Vec::new();
    }

    let frames = channels[0].len();
    let mut result = Vec::with_capacity(frames * channels.len());

    for frame in 0..frames {
        for channel in channels {
            result.push(channel[frame].round() as i32);
        }
    }

    result
}

/// Linear interpolation resampling
fn resample_linear(samples: &[f64], ratio: f64) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).round() as usize;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = src_pos - src_idx as f64;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}
