//! Relationship graph kept alongside the record store.
//!
//! # Responsibility
//! - Mirror visible contacts as nodes linked in insertion order.
//!
//! # Invariants
//! - A new node links only to the most recently created surviving node.
//! - Removing a node never re-links its former neighbours.

pub mod chain;
