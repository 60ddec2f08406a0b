//! Error handling for sfxedit
//!
//! Every editor operation returns a typed error. A failed operation leaves the
//! active buffer and history untouched, so the user can simply retry.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sfxedit operations
pub type Result<T> = std::result::Result<T, SfxError>;

/// Main error type for sfxedit operations
#[derive(Error, Debug)]
pub enum SfxError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Editor Errors
    #[error("No audio loaded")]
    NoAudioLoaded,

    #[error("Audio file not in library: {path}")]
    NotInLibrary { path: PathBuf },

    #[error("Invalid range: {start_ms}ms..{end_ms}ms (clip is {len_ms}ms)")]
    InvalidRange {
        start_ms: u64,
        end_ms: u64,
        len_ms: u64,
    },

    #[error("Invalid parameter {param}={value}: expected {expected}")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SfxError {
    /// Shorthand for an [`SfxError::InvalidParameter`]
    pub fn invalid_param(
        param: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        SfxError::InvalidParameter {
            param: param.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SfxError::FileNotFound { .. } => "FILE_NOT_FOUND",
            SfxError::InvalidAudio { .. } => "INVALID_AUDIO",
            SfxError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            SfxError::Decode(_) => "DECODE_ERROR",
            SfxError::EmptyAudio => "EMPTY_AUDIO",
            SfxError::NoAudioLoaded => "NO_AUDIO_LOADED",
            SfxError::NotInLibrary { .. } => "NOT_IN_LIBRARY",
            SfxError::InvalidRange { .. } => "INVALID_RANGE",
            SfxError::InvalidParameter { .. } => "INVALID_PARAMETER",
            SfxError::Config(_) => "CONFIG_ERROR",
            SfxError::Io(_) => "IO_ERROR",
        }
    }

    /// Get a user-friendly message for this error, suitable for a message dialog
    pub fn friendly_message(&self) -> String {
        match self {
            SfxError::FileNotFound { path } => {
                format!("Couldn't find '{}'. Check the path and try again.", path.display())
            }
            SfxError::UnsupportedFormat { format } => {
                format!("'{}' isn't supported. Use WAV, MP3 or FLAC.", format)
            }
            SfxError::NoAudioLoaded => {
                "Open or generate a sound before applying edits.".to_string()
            }
            SfxError::NotInLibrary { path } => format!(
                "'{}' hasn't been added yet. Add it to the mixer first.",
                path.display()
            ),
            SfxError::InvalidRange {
                start_ms,
                end_ms,
                len_ms,
            } => format!(
                "Can't trim {}ms..{}ms from a {}ms clip. Start must be before end.",
                start_ms, end_ms, len_ms
            ),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SfxError::FileNotFound {
            path: PathBuf::from("test.wav"),
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
        assert_eq!(SfxError::NoAudioLoaded.error_code(), "NO_AUDIO_LOADED");
    }

    #[test]
    fn test_friendly_message_mentions_range() {
        let err = SfxError::InvalidRange {
            start_ms: 500,
            end_ms: 100,
            len_ms: 1000,
        };
        let msg = err.friendly_message();
        assert!(msg.contains("500ms..100ms"));
        assert!(msg.contains("1000ms"));
    }

    #[test]
    fn test_invalid_param_helper() {
        let err = SfxError::invalid_param("ratio", 0.5, ">= 1.0");
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(
            err.to_string(),
            "Invalid parameter ratio=0.5: expected >= 1.0"
        );
    }
}
