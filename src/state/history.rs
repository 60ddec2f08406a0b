//! Undo/Redo History
//!
//! Snapshot-based undo/redo. Every entry holds the complete buffer produced
//! by one operation; buffers share sample storage so snapshots are cheap.
//!
//! The bottom of the undo stack is the base snapshot (usually the loaded
//! file) and is never popped: once anything has been pushed, undo always
//! leaves at least one entry behind.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AudioBuffer;

/// Kind of operation that produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Audio file loaded from disk.
    Load,

    /// An effect applied to the active buffer.
    Effect,

    /// A synthesized sound replaced the active buffer.
    Generate,

    /// Two library clips mixed together.
    Mix,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Load => write!(f, "Load"),
            ActionType::Effect => write!(f, "Effect"),
            ActionType::Generate => write!(f, "Generate"),
            ActionType::Mix => write!(f, "Mix"),
        }
    }
}

/// A single snapshot in the history.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Unique identifier for this entry.
    pub id: Uuid,

    /// Type of action performed.
    pub action_type: ActionType,

    /// Human-readable description, e.g. "Fade in 2000 ms".
    pub label: String,

    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// The buffer after the action.
    pub buffer: AudioBuffer,
}

impl HistoryEntry {
    /// Create a new entry with a generated UUID.
    pub fn new(action_type: ActionType, label: impl Into<String>, buffer: AudioBuffer) -> Self {
        Self {
            id: Uuid::new_v4(),
            action_type,
            label: label.into(),
            timestamp: Utc::now(),
            buffer,
        }
    }
}

/// Manages undo/redo stacks of buffer snapshots.
///
/// - `undo_stack`: every snapshot up to and including the current one
/// - `redo_stack`: snapshots that were undone, most recent last
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,

    /// Maximum undo stack size; `None` keeps everything.
    max_depth: Option<usize>,

    /// Number of entries dropped off the bottom by the depth limit.
    discarded: usize,
}

impl HistoryManager {
    /// Create a history with no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history keeping at most `max_depth` snapshots (minimum 1).
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth: max_depth.map(|d| d.max(1)),
            ..Self::default()
        }
    }

    /// Record a new snapshot.
    ///
    /// Clears the redo stack and trims the oldest entries past the depth
    /// limit; the oldest survivor becomes the new base.
    pub fn push(&mut self, action_type: ActionType, label: impl Into<String>, buffer: AudioBuffer) {
        let entry = HistoryEntry::new(action_type, label, buffer);
        debug!("History push: {} ({})", entry.label, entry.id);

        self.redo_stack.clear();
        self.undo_stack.push(entry);
        self.trim_history();
    }

    /// Step back one snapshot.
    ///
    /// Returns the new current buffer, or `None` if only the base snapshot
    /// is left.
    pub fn undo(&mut self) -> Option<AudioBuffer> {
        if self.undo_stack.len() <= 1 {
            return None;
        }

        let entry = self.undo_stack.pop()?;
        debug!("History undo: {}", entry.label);
        self.redo_stack.push(entry);
        self.current().cloned()
    }

    /// Re-apply the most recently undone snapshot.
    ///
    /// Returns the restored buffer, or `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<AudioBuffer> {
        let entry = self.redo_stack.pop()?;
        debug!("History redo: {}", entry.label);
        let buffer = entry.buffer.clone();
        self.undo_stack.push(entry);
        Some(buffer)
    }

    /// The buffer at the top of the undo stack.
    pub fn current(&self) -> Option<&AudioBuffer> {
        self.undo_stack.last().map(|entry| &entry.buffer)
    }

    /// Check if undo would change anything.
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Check if there are entries that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of snapshots on the undo stack, base included.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of snapshots that can be redone.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo stack entries, oldest first, for a history list view.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.undo_stack
    }

    /// The most recently undone entry (if any).
    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redo_stack.last()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Number of entries dropped by the depth limit so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.discarded += self.undo_stack.len() + self.redo_stack.len();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn trim_history(&mut self) {
        let Some(max) = self.max_depth else {
            return;
        };
        if self.undo_stack.len() > max {
            let excess = self.undo_stack.len() - max;
            self.undo_stack.drain(..excess);
            self.discarded += excess;
        }
    }
}
