//! Audio Engine Module
//!
//! Core audio plumbing shared by the editor:
//! - Immutable PCM snapshots and format conversion
//! - File import/export
//! - Tone and preset synthesis
//! - Playback transport state machine

pub mod buffer;
mod convert;
pub mod io;
pub mod synth;
pub mod transport;

pub use buffer::{AudioBuffer, DEFAULT_SAMPLE_RATE, DEFAULT_SAMPLE_WIDTH};
pub use io::{export_wav, import_audio, AudioFormat};
pub use synth::{SoundPreset, Synth, ToneSpec, WaveType};
pub use transport::{Transport, TransportState, PLAYHEAD_POLL_INTERVAL_MS};
