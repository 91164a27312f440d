//! In-memory record store.
//!
//! # Responsibility
//! - Own every contact record of a session in an id-addressed arena.
//! - Keep the visible newest-first order separate from record storage.
//! - Provide lazy, order-preserving queries over visible records.
//!
//! # Invariants
//! - The visible order never holds the same `ContactId` twice.
//! - A detached record stays in the arena until it is removed explicitly.

pub mod query;
pub mod record_store;
