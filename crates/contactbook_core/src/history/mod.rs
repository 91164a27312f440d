//! Undo/redo history.
//!
//! # Responsibility
//! - Hold tagged mutation entries in two LIFO sequences.
//! - Stay storage-agnostic: entries reference records by `ContactId` only.
//!
//! # Invariants
//! - Popping from one side is the only way an entry reaches the other side.
//! - Histories are unbounded for the lifetime of a book.

pub mod journal;
