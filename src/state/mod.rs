//! State Management Module
//!
//! Editor session state, effect overlay records and snapshot undo/redo.

pub mod audio_state;
pub mod effects;
pub mod history;

pub use audio_state::AudioState;
pub use effects::EffectRecord;
pub use history::{ActionType, HistoryEntry, HistoryManager};
