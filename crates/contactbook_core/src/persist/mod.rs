//! Persistence adapters for the contact set.
//!
//! # Responsibility
//! - Define the save/load contract the book calls after each mutation.
//! - Keep file-format details out of the service layer.
//!
//! # Invariants
//! - `save` replaces the whole destination; partial writes are never visible.
//! - A missing source on `load` is an outcome, not an error.

use crate::model::contact::Contact;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod flat_file;

pub use flat_file::FlatFilePersistence;

pub type PersistResult<T> = Result<T, PersistError>;

/// I/O failure while reading or writing the contact file.
#[derive(Debug)]
pub enum PersistError {
    /// Temporary file could not be created or written.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Finished temporary file could not replace the destination.
    Replace {
        path: PathBuf,
        source: std::io::Error,
    },
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PersistError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Write { .. } => "write_failed",
            Self::Replace { .. } => "replace_failed",
            Self::Read { .. } => "read_failed",
        }
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write { path, source } => {
                write!(f, "unable to write contacts near `{}`: {source}", path.display())
            }
            Self::Replace { path, source } => {
                write!(f, "unable to replace `{}`: {source}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "unable to read `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Write { source, .. } | Self::Replace { source, .. } | Self::Read { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Non-fatal persistence problem attached to an otherwise successful outcome.
///
/// The in-memory book stays authoritative when one of these is reported.
#[derive(Debug)]
pub enum PersistenceWarning {
    SaveFailed(PersistError),
    LoadFailed(PersistError),
    /// No contact file existed; the book started empty.
    FileMissing(PathBuf),
}

impl Display for PersistenceWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SaveFailed(err) => write!(f, "contacts not saved: {err}"),
            Self::LoadFailed(err) => write!(f, "contacts not loaded: {err}"),
            Self::FileMissing(path) => write!(
                f,
                "contacts file `{}` not found; starting with an empty book",
                path.display()
            ),
        }
    }
}

impl Error for PersistenceWarning {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SaveFailed(err) | Self::LoadFailed(err) => Some(err),
            Self::FileMissing(_) => None,
        }
    }
}

/// One unvalidated row read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContact {
    /// 1-based line number in the source.
    pub line: usize,
    pub name: String,
    pub phone: String,
    pub category: String,
}

/// One non-blank line read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRow {
    Parsed(RawContact),
    /// Line bytes were not valid UTF-8.
    Undecodable { line: usize },
}

/// Result of reading stored contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Missing(PathBuf),
    Rows(Vec<StoredRow>),
}

/// Storage contract used by `ContactBook`.
pub trait ContactPersistence {
    /// Replaces stored contents with `contacts`, in order.
    fn save(&self, contacts: &[&Contact]) -> PersistResult<()>;
    /// Reads stored rows without validating them.
    fn load(&self) -> PersistResult<LoadOutcome>;
}
