//! sfxedit - Game Sound-Effect Editor
//!
//! Load, edit, synthesize and mix short audio clips for games.
//!
//! # Architecture
//!
//! - `engine`: immutable PCM snapshots, file I/O, synthesis, transport
//! - `dsp`: pure `AudioBuffer -> AudioBuffer` effects
//! - `state`: session state, effect overlays and snapshot undo/redo
//! - `editor`: the stateful [`AudioEditor`] tying it all together
//! - `waveform`: min/max overview data for plotting
//!
//! Every edit produces a new buffer. Buffers share their sample storage, so
//! keeping a snapshot per history entry costs one reference count.

pub mod cli;
pub mod config;
pub mod dsp;
pub mod editor;
pub mod engine;
pub mod error;
pub mod state;
pub mod waveform;

pub use config::EditorConfig;
pub use editor::{AudioEditor, EditCommand};
pub use engine::AudioBuffer;
pub use error::{Result, SfxError};
