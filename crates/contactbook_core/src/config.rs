//! Book configuration.
//!
//! # Responsibility
//! - Name the contact file and the undo semantics for one session.
//!
//! # Invariants
//! - Defaults reproduce the classic contact manager: `contacts.txt` in the
//!   working directory and retract-style undo.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "contacts.txt";

/// How undo and redo interpret history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndoPolicy {
    /// Undo removes the referenced record from the visible order, whatever
    /// the recorded mutation was; redo puts it back at the front. Deletes are
    /// not undoable and a new mutation keeps the redo history.
    #[default]
    Retract,
    /// Undo inverts the recorded mutation: adds are removed, updates restore
    /// the previous field value, deletes reinsert the record where it was.
    /// A new mutation clears the redo history.
    Revert,
}

impl UndoPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Retract => "retract",
            Self::Revert => "revert",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "retract" => Some(Self::Retract),
            "revert" => Some(Self::Revert),
            _ => None,
        }
    }
}

impl Display for UndoPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for opening a file-backed book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    pub data_file: PathBuf,
    pub undo_policy: UndoPolicy,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            undo_policy: UndoPolicy::default(),
        }
    }
}
