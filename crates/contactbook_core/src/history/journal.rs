//! History entries and the undo/redo journal.

use crate::model::contact::{ContactField, ContactId};
use std::fmt::{Display, Formatter};

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Added(ContactId),
    Updated {
        id: ContactId,
        field: ContactField,
        previous: String,
        next: String,
    },
    /// Only recorded under `UndoPolicy::Revert`.
    Deleted { id: ContactId, position: usize },
}

impl HistoryEntry {
    pub fn contact_id(&self) -> ContactId {
        match self {
            Self::Added(id) => *id,
            Self::Updated { id, .. } => *id,
            Self::Deleted { id, .. } => *id,
        }
    }

    /// Stable label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Added(_) => "add",
            Self::Updated { .. } => "update",
            Self::Deleted { .. } => "delete",
        }
    }
}

/// Which side of the journal an operation reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl Display for HistoryDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undo => write!(f, "undo"),
            Self::Redo => write!(f, "redo"),
        }
    }
}

/// Two LIFO sequences of history entries.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fresh mutation. The redo side is left untouched.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.undo.push(entry);
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo.pop()
    }

    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo.push(entry);
    }

    /// Returns a redone entry to the undo side without touching redo.
    pub fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo.push(entry);
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    /// Drops every entry on both sides that references `id`.
    ///
    /// Returns how many entries were dropped.
    pub fn forget(&mut self, id: ContactId) -> usize {
        let before = self.undo.len() + self.redo.len();
        self.undo.retain(|entry| entry.contact_id() != id);
        self.redo.retain(|entry| entry.contact_id() != id);
        before - self.undo.len() - self.redo.len()
    }

    /// Most recent undo entry, if any.
    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.undo.last()
    }

    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redo.last()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}
