//! Core domain logic for the contact book.
//! This crate owns every business invariant; the CLI only renders results.

pub mod config;
pub mod graph;
pub mod history;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use config::{BookConfig, UndoPolicy, DEFAULT_DATA_FILE};
pub use graph::chain::{GraphNode, RelationshipGraph};
pub use history::journal::{History, HistoryDirection, HistoryEntry};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{
    is_valid_phone, validate_field, Contact, ContactField, ContactId, ContactValidationError,
    PHONE_DIGITS,
};
pub use persist::{
    ContactPersistence, FlatFilePersistence, LoadOutcome, PersistError, PersistResult,
    PersistenceWarning, RawContact, StoredRow,
};
pub use service::contact_book::{
    BookError, BookResult, ContactBook, LoadReport, Mutation, RejectedRow, RowError,
};
pub use store::query::{ContactQuery, NameOrdering};
pub use store::record_store::RecordStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
