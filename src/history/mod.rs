//! Recent-selection history.
//!
//! Bounded, most-recent-first window over the last selected notes, used by
//! the weighting engine to penalize immediate repetition. Push-front with
//! truncation; there is no removal short of a full reset.

use std::collections::VecDeque;

use crate::types::Note;

/// Number of recent selections the window retains.
pub const HISTORY_CAPACITY: usize = 10;

/// Ordered window of recently selected notes, newest first.
#[derive(Clone, Debug, Default)]
pub struct SelectionHistory {
    entries: VecDeque<Note>,
}

impl SelectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, evicting the oldest entry past capacity.
    pub fn push(&mut self, note: Note) {
        self.entries.push_front(note);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// 0-based recency slot of an item id; 0 is the most recent selection.
    pub fn position(&self, item_id: &str) -> Option<usize> {
        self.entries.iter().position(|n| n.id == item_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered snapshot for persistence, newest first.
    pub fn snapshot(&self) -> Vec<Note> {
        self.entries.iter().cloned().collect()
    }

    /// Replace the window contents from a snapshot.
    pub fn restore(&mut self, notes: Vec<Note>) {
        self.entries = notes.into_iter().take(HISTORY_CAPACITY).collect();
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
