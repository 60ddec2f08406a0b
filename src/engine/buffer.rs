//! Audio Buffer Management
//!
//! Provides the immutable PCM snapshot type every edit operates on.
//! Samples are stored interleaved as integers at the buffer's own sample
//! width, exactly as they would be written to a WAV file. The sample storage
//! is reference counted, so cloning a buffer for the undo history is cheap.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{Result, SfxError};

// ============================================================================
// Constants
// ============================================================================

/// Sample rate used for generated sounds and pitch-shift output
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Sample width (bytes) used for generated and decoded audio
pub const DEFAULT_SAMPLE_WIDTH: u16 = 2;

/// Quietest gain used by fades, treated as silence
pub const SILENCE_DB: f64 = -120.0;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns -infinity for zero input.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Immutable PCM audio snapshot
///
/// Holds interleaved integer samples plus the metadata needed to interpret
/// them. Every editing operation produces a new `AudioBuffer`; nothing ever
/// mutates one in place. Equality is byte identity: same samples, same
/// format.
///
/// # Example
/// ```
/// use sfxedit::engine::AudioBuffer;
///
/// let buffer = AudioBuffer::silent(500, 44100, 2, 2).unwrap();
/// assert_eq!(buffer.len_ms(), 500);
/// assert_eq!(buffer.frame_count(), 22050);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Arc<[i32]>,
    sample_rate: u32,
    channels: u16,
    sample_width: u16,
}

impl AudioBuffer {
    /// Create a buffer from interleaved integer samples
    ///
    /// Samples outside the range of `sample_width` are clipped.
    ///
    /// # Errors
    /// * `InvalidParameter` - zero rate or channels, width outside 1..=4
    /// * `InvalidAudio` - sample count not divisible by the channel count
    pub fn new(
        samples: Vec<i32>,
        sample_rate: u32,
        channels: u16,
        sample_width: u16,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SfxError::invalid_param("sample_rate", sample_rate, "> 0"));
        }
        if channels == 0 {
            return Err(SfxError::invalid_param("channels", channels, ">= 1"));
        }
        if !(1..=4).contains(&sample_width) {
            return Err(SfxError::invalid_param(
                "sample_width",
                sample_width,
                "1, 2, 3 or 4 bytes",
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(SfxError::InvalidAudio {
                reason: format!(
                    "Interleaved data length {} is not divisible by channel count {}",
                    samples.len(),
                    channels
                ),
                source: None,
            });
        }

        let (min, max) = sample_range(sample_width);
        let samples: Vec<i32> = samples.into_iter().map(|s| s.clamp(min, max)).collect();

        Ok(Self {
            samples: samples.into(),
            sample_rate,
            channels,
            sample_width,
        })
    }

    /// Create a buffer of silence lasting `duration_ms`
    ///
    /// # Errors
    /// Same format checks as [`AudioBuffer::new`].
    pub fn silent(
        duration_ms: u64,
        sample_rate: u32,
        channels: u16,
        sample_width: u16,
    ) -> Result<Self> {
        let frames = frames_for_ms(duration_ms, sample_rate);
        Self::new(
            vec![0; frames.saturating_mul(channels as usize)],
            sample_rate,
            channels,
            sample_width,
        )
    }

    /// Create a buffer from normalized samples in -1.0..=1.0
    pub fn from_normalized(
        samples: &[f32],
        sample_rate: u32,
        channels: u16,
        sample_width: u16,
    ) -> Result<Self> {
        let scale = max_amplitude(sample_width.clamp(1, 4));
        let ints = samples
            .iter()
            .map(|&s| (s as f64 * scale).round() as i32)
            .collect();
        Self::new(ints, sample_rate, channels, sample_width)
    }

    /// Build a buffer in the same format as `self` from new samples
    ///
    /// Values are saturated to the sample width, mirroring how the editing
    /// primitives clip rather than wrap.
    pub(crate) fn with_samples(&self, samples: Vec<i64>) -> Self {
        let (min, max) = sample_range(self.sample_width);
        let clipped: Vec<i32> = samples
            .into_iter()
            .map(|s| s.clamp(min as i64, max as i64) as i32)
            .collect();
        Self {
            samples: clipped.into(),
            sample_rate: self.sample_rate,
            channels: self.channels,
            sample_width: self.sample_width,
        }
    }

    /// Same samples, different format metadata (no conversion)
    pub(crate) fn from_parts_unchecked(
        samples: Vec<i32>,
        sample_rate: u32,
        channels: u16,
        sample_width: u16,
    ) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
            channels,
            sample_width,
        }
    }

    /// Interleaved samples
    #[inline]
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels
    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Bytes per sample (1-4)
    #[inline]
    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    /// Number of frames (samples per channel)
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Check if the buffer holds no frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in whole milliseconds
    pub fn len_ms(&self) -> u64 {
        self.frame_count() as u64 * 1000 / self.sample_rate as u64
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Number of frames covering `ms` milliseconds at this buffer's rate
    #[inline]
    pub fn frames_for_ms(&self, ms: u64) -> usize {
        frames_for_ms(ms, self.sample_rate)
    }

    /// Largest representable magnitude, e.g. 32768 for 16-bit
    #[inline]
    pub fn max_possible_amplitude(&self) -> f64 {
        max_amplitude(self.sample_width)
    }

    /// Peak absolute sample value
    pub fn peak(&self) -> i32 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .map(|p| p.min(i32::MAX as u32) as i32)
            .unwrap_or(0)
    }

    /// Root-mean-square sample value across all channels
    pub fn rms(&self) -> f64 {
        rms_of(&self.samples)
    }

    /// RMS level relative to full scale, in dB
    pub fn dbfs(&self) -> f64 {
        linear_to_db(self.rms() / self.max_possible_amplitude())
    }

    /// Copy out frames `start..end` (clamped to the buffer)
    pub fn slice_frames(&self, start: usize, end: usize) -> Self {
        let frames = self.frame_count();
        let end = end.min(frames);
        let start = start.min(end);
        let ch = self.channels as usize;
        Self {
            samples: self.samples[start * ch..end * ch].to_vec().into(),
            sample_rate: self.sample_rate,
            channels: self.channels,
            sample_width: self.sample_width,
        }
    }

    /// Samples as normalized f32 (-1.0..1.0), still interleaved
    pub fn to_normalized(&self) -> Vec<f32> {
        let scale = self.max_possible_amplitude();
        self.samples
            .iter()
            .map(|&s| (s as f64 / scale) as f32)
            .collect()
    }

    /// SHA-256 of format and samples, as lowercase hex
    ///
    /// Two buffers with the same fingerprint are byte-identical.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sample_rate.to_le_bytes());
        hasher.update(self.channels.to_le_bytes());
        hasher.update(self.sample_width.to_le_bytes());
        for sample in self.samples.iter() {
            hasher.update(sample.to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Check whether two buffers share the same sample storage
    pub fn shares_storage_with(&self, other: &AudioBuffer) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Frames covering `ms` at `sample_rate`, saturating at `usize::MAX`
#[inline]
pub(crate) fn frames_for_ms(ms: u64, sample_rate: u32) -> usize {
    let frames = ms as u128 * sample_rate as u128 / 1000;
    usize::try_from(frames).unwrap_or(usize::MAX)
}

/// Inclusive integer range for a sample width
#[inline]
pub(crate) fn sample_range(sample_width: u16) -> (i32, i32) {
    match sample_width {
        1 => (i8::MIN as i32, i8::MAX as i32),
        2 => (i16::MIN as i32, i16::MAX as i32),
        3 => (-8_388_608, 8_388_607),
        _ => (i32::MIN, i32::MAX),
    }
}

#[inline]
pub(crate) fn max_amplitude(sample_width: u16) -> f64 {
    (1u64 << (8 * sample_width as u32 - 1)) as f64
}

pub(crate) fn rms_of(samples: &[i32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-9);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-4);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-9);
        assert!(db_to_linear(SILENCE_DB) < 1e-5);
    }

    #[test]
    fn test_linear_to_db() {
        assert!(linear_to_db(1.0).abs() < 1e-9);
        assert!((linear_to_db(0.1) + 20.0).abs() < 1e-9);
        assert!(linear_to_db(0.0).is_infinite());
    }

    #[test]
    fn test_new_rejects_bad_format() {
        assert!(AudioBuffer::new(vec![0; 4], 0, 1, 2).is_err());
        assert!(AudioBuffer::new(vec![0; 4], 44100, 0, 2).is_err());
        assert!(AudioBuffer::new(vec![0; 4], 44100, 1, 5).is_err());
        assert!(matches!(
            AudioBuffer::new(vec![0; 5], 44100, 2, 2),
            Err(SfxError::InvalidAudio { .. })
        ));
    }

    #[test]
    fn test_new_clips_to_width() {
        let buffer = AudioBuffer::new(vec![40_000, -40_000, 12], 44100, 1, 2).unwrap();
        assert_eq!(buffer.samples(), &[32767, -32768, 12]);
    }

    #[test]
    fn test_durations() {
        let buffer = AudioBuffer::silent(1500, 44100, 2, 2).unwrap();
        assert_eq!(buffer.frame_count(), 66150);
        assert_eq!(buffer.samples().len(), 132300);
        assert_eq!(buffer.len_ms(), 1500);
        assert!((buffer.duration_secs() - 1.5).abs() < 1e-9);
        assert_eq!(buffer.frames_for_ms(10), 441);
    }

    #[test]
    fn test_frames_for_huge_ms_saturates() {
        let buffer = AudioBuffer::new(vec![0; 4], 44100, 1, 2).unwrap();
        assert_eq!(buffer.frames_for_ms(u64::MAX), usize::MAX);
    }

    #[test]
    fn test_silent_validates_format() {
        assert!(matches!(
            AudioBuffer::silent(10, 1000, 0, 2),
            Err(SfxError::InvalidParameter { .. })
        ));
        assert!(AudioBuffer::silent(10, 0, 1, 2).is_err());
        assert!(AudioBuffer::silent(10, 1000, 1, 5).is_err());
    }

    #[test]
    fn test_peak_and_rms() {
        let buffer = AudioBuffer::new(vec![100, -200, 100, -200], 8000, 2, 2).unwrap();
        assert_eq!(buffer.peak(), 200);
        let expected = ((100.0f64 * 100.0 * 2.0 + 200.0 * 200.0 * 2.0) / 4.0).sqrt();
        assert!((buffer.rms() - expected).abs() < 1e-9);

        let silent = AudioBuffer::silent(10, 8000, 1, 2).unwrap();
        assert_eq!(silent.peak(), 0);
        assert!(silent.dbfs().is_infinite());
    }

    #[test]
    fn test_slice_frames_clamps() {
        let buffer = AudioBuffer::new((0..10).collect(), 1000, 2, 2).unwrap();
        let slice = buffer.slice_frames(1, 3);
        assert_eq!(slice.samples(), &[2, 3, 4, 5]);
        let tail = buffer.slice_frames(4, 100);
        assert_eq!(tail.samples(), &[8, 9]);
        assert!(buffer.slice_frames(9, 2).is_empty());
    }

    #[test]
    fn test_normalized_conversion() {
        let buffer = AudioBuffer::from_normalized(&[0.5, -1.0], 44100, 1, 2).unwrap();
        assert_eq!(buffer.samples(), &[16384, -32768]);
        let back = buffer.to_normalized();
        assert!((back[0] - 0.5).abs() < 1e-6);
        assert!((back[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clone_is_byte_identical_and_shared() {
        let buffer = AudioBuffer::new(vec![1, 2, 3, 4], 44100, 2, 2).unwrap();
        let snapshot = buffer.clone();
        assert_eq!(buffer, snapshot);
        assert!(buffer.shares_storage_with(&snapshot));
        assert_eq!(buffer.fingerprint(), snapshot.fingerprint());
    }

    #[test]
    fn test_fingerprint_covers_format() {
        let a = AudioBuffer::new(vec![1, 2], 44100, 1, 2).unwrap();
        let b = AudioBuffer::new(vec![1, 2], 22050, 1, 2).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_with_samples_saturates() {
        let buffer = AudioBuffer::silent(1, 1000, 1, 1).unwrap();
        let loud = buffer.with_samples(vec![500]);
        assert_eq!(loud.samples(), &[127]);
    }
}
