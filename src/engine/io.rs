//! Audio file I/O for sfxedit
//!
//! WAV files are read and written with `hound`, keeping the file's own
//! sample rate, channel count and bit depth. MP3 and FLAC are decoded with
//! Symphonia into 16-bit samples. Export is always WAV.

use std::fs::File;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::engine::buffer::{AudioBuffer, DEFAULT_SAMPLE_WIDTH};
use crate::error::{Result, SfxError};

/// Container formats accepted by [`import_audio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
}

impl AudioFormat {
    /// Guess the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" | "wave" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }
}

/// Import an audio file into an [`AudioBuffer`]
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `UnsupportedFormat` - If the extension is not wav/mp3/flac
/// * `InvalidAudio` / `Decode` - If the file cannot be decoded
/// * `EmptyAudio` - If the file decodes to zero samples
pub fn import_audio(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(SfxError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = AudioFormat::from_path(path).ok_or_else(|| SfxError::UnsupportedFormat {
        format: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("<none>")
            .to_string(),
    })?;

    let buffer = match format {
        AudioFormat::Wav => read_wav(path)?,
        AudioFormat::Mp3 | AudioFormat::Flac => decode_compressed(path)?,
    };

    if buffer.is_empty() {
        return Err(SfxError::EmptyAudio);
    }

    info!(
        "Imported {} ({} Hz, {} ch, {}-bit, {} ms)",
        path.display(),
        buffer.sample_rate(),
        buffer.channels(),
        buffer.sample_width() * 8,
        buffer.len_ms()
    );

    Ok(buffer)
}

/// Export an [`AudioBuffer`] as a WAV file in its own format
pub fn export_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: buffer.sample_width() * 8,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(hound_to_io)?;

    match buffer.sample_width() {
        1 => {
            for &sample in buffer.samples() {
                writer.write_sample(sample as i8).map_err(hound_to_io)?;
            }
        }
        2 => {
            for &sample in buffer.samples() {
                writer.write_sample(sample as i16).map_err(hound_to_io)?;
            }
        }
        _ => {
            for &sample in buffer.samples() {
                writer.write_sample(sample).map_err(hound_to_io)?;
            }
        }
    }

    writer.finalize().map_err(hound_to_io)?;

    debug!(
        "Exported {} frames to {}",
        buffer.frame_count(),
        path.display()
    );
    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn hound_to_io(e: hound::Error) -> SfxError {
    match e {
        hound::Error::IoError(io) => SfxError::Io(io),
        other => SfxError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            other.to_string(),
        )),
    }
}

fn read_wav(path: &Path) -> Result<AudioBuffer> {
    let reader = WavReader::open(path).map_err(|e| SfxError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let (samples, sample_width) = read_samples(reader, spec)?;

    AudioBuffer::new(samples, spec.sample_rate, spec.channels, sample_width)
}

/// Read WAV samples as integers, returning them with their width in bytes
fn read_samples<R: std::io::Read>(
    mut reader: WavReader<R>,
    spec: WavSpec,
) -> Result<(Vec<i32>, u16)> {
    let invalid = |e: hound::Error| SfxError::InvalidAudio {
        reason: format!("Failed to read samples: {}", e),
        source: Some(Box::new(e)),
    };

    match spec.sample_format {
        SampleFormat::Float => {
            // Float WAVs are quantized to 16-bit like decoded MP3/FLAC
            let scale = i16::MAX as f32;
            let samples = reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * scale).round() as i32))
                .collect::<std::result::Result<Vec<i32>, _>>()
                .map_err(invalid)?;
            Ok((samples, DEFAULT_SAMPLE_WIDTH))
        }
        SampleFormat::Int => match spec.bits_per_sample {
            8 => {
                let samples = reader
                    .samples::<i8>()
                    .map(|s| s.map(|v| v as i32))
                    .collect::<std::result::Result<Vec<i32>, _>>()
                    .map_err(invalid)?;
                Ok((samples, 1))
            }
            16 => {
                let samples = reader
                    .samples::<i16>()
                    .map(|s| s.map(|v| v as i32))
                    .collect::<std::result::Result<Vec<i32>, _>>()
                    .map_err(invalid)?;
                Ok((samples, 2))
            }
            24 | 32 => {
                let samples = reader
                    .samples::<i32>()
                    .collect::<std::result::Result<Vec<i32>, _>>()
                    .map_err(invalid)?;
                Ok((samples, spec.bits_per_sample / 8))
            }
            bits => Err(SfxError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits),
            }),
        },
    }
}

/// Decode MP3/FLAC with Symphonia into a 16-bit buffer
fn decode_compressed(path: &Path) -> Result<AudioBuffer> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| SfxError::UnsupportedFormat {
            format: format!("{}: {}", path.display(), e),
        })?;

    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SfxError::Decode("No audio track found".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| SfxError::UnsupportedFormat {
            format: format!("Codec init failed: {}", e),
        })?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|c| c.count() as u16);
    let mut samples: Vec<i32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(SfxError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!("Skipping corrupted audio packet: {}", msg);
                continue;
            }
            Err(e) => return Err(SfxError::Decode(e.to_string())),
        };

        if decoded.frames() == 0 {
            continue;
        }

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        channels.get_or_insert(spec.channels.count() as u16);

        let mut sample_buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend(sample_buf.samples().iter().map(|&s| s as i32));
    }

    let sample_rate =
        sample_rate.ok_or_else(|| SfxError::Decode("No sample rate in stream".to_string()))?;
    let channels =
        channels.ok_or_else(|| SfxError::Decode("No channel info in stream".to_string()))?;

    AudioBuffer::new(samples, sample_rate, channels, DEFAULT_SAMPLE_WIDTH)
}

// ============================================================================
// Tests
// ============================================================================
