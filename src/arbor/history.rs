//! # Undo/Redo History
//!
//! Linear, snapshot-based history. Each entry is a full deep copy of the tree
//! together with the focus and the id counter, so restoring an entry puts the
//! document back exactly as it was, including which ids will be issued next.
//!
//! ## Index Semantics
//!
//! ```text
//! entries:  [ s0 ][ s1 ][ s2 ][ s3 ]
//!                        ^ index
//! ```
//!
//! - `record` drops everything after `index` (the redo branch), appends, and
//!   moves `index` to the new entry.
//! - When the list grows past the limit the oldest entry is dropped and
//!   `index` stays put, which leaves it on the newest entry again.
//! - `undo` is a no-op at `index <= 0`; `redo` is a no-op at the newest entry.
//!
//! The document records a baseline entry when it is created or loaded and one
//! entry after each applied mutation, so `entries[index - 1]` is always the
//! state right before the latest change.

use crate::model::{Node, NodeId};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Frozen document state. Selection and clipboard are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub root: Node,
    pub focus: Option<NodeId>,
    pub next_id: u64,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    index: Option<usize>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: None,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the current entry, `None` before the first record.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.index {
            Some(i) => i + 1 < self.entries.len(),
            None => false,
        }
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);

        if self.entries.len() > self.limit {
            self.entries.pop_front();
        } else {
            self.index = Some(self.index.map_or(0, |i| i + 1));
        }
    }

    /// Step back and return the entry to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let i = self.index? - 1;
        self.index = Some(i);
        self.entries.get(i)
    }

    /// Step forward and return the entry to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        let i = self.index? + 1;
        self.index = Some(i);
        self.entries.get(i)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}
