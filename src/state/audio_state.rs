//! Editor application state
//!
//! Everything the front end redraws from: the active buffer, the library
//! of loaded files, effect overlays, key points and the playback transport.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::engine::{AudioBuffer, Transport};
use crate::state::effects::EffectRecord;

/// Mutable state owned by one editor session.
#[derive(Debug, Clone, Default)]
pub struct AudioState {
    /// The buffer edits apply to.
    pub current: Option<AudioBuffer>,

    /// Files loaded in this session, keyed by the path they were loaded from.
    pub library: BTreeMap<PathBuf, AudioBuffer>,

    /// Applied effects, for waveform overlays.
    pub effects: Vec<EffectRecord>,

    /// User-placed markers, in ms.
    pub key_points: Vec<u64>,

    /// Most recent volume change in dB.
    pub last_volume_db: Option<f64>,

    /// Playback state and playhead.
    pub transport: Transport,
}

impl AudioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Playhead offset in ms.
    pub fn playhead_ms(&self) -> u64 {
        self.transport.playhead_ms()
    }

    /// Duration of the active buffer, 0 when nothing is loaded.
    pub fn duration_ms(&self) -> u64 {
        self.current.as_ref().map_or(0, AudioBuffer::len_ms)
    }

    pub fn has_audio(&self) -> bool {
        self.current.is_some()
    }

    pub fn library_buffer(&self, path: &Path) -> Option<&AudioBuffer> {
        self.library.get(path)
    }

    /// Paths in the library, sorted.
    pub fn library_paths(&self) -> impl Iterator<Item = &Path> {
        self.library.keys().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = AudioState::new();
        assert!(!state.has_audio());
        assert_eq!(state.duration_ms(), 0);
        assert_eq!(state.playhead_ms(), 0);
        assert_eq!(state.library_paths().count(), 0);
    }

    #[test]
    fn test_library_lookup() {
        let mut state = AudioState::new();
        let buffer = AudioBuffer::silent(250, 1000, 1, 2).unwrap();
        state.library.insert(PathBuf::from("b.wav"), buffer.clone());
        state.library.insert(PathBuf::from("a.wav"), buffer.clone());
        state.current = Some(buffer);

        assert_eq!(state.duration_ms(), 250);
        assert!(state.library_buffer(Path::new("a.wav")).is_some());
        assert!(state.library_buffer(Path::new("c.wav")).is_none());
        let paths: Vec<_> = state.library_paths().collect();
        assert_eq!(paths, vec![Path::new("a.wav"), Path::new("b.wav")]);
    }
}
