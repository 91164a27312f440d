//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its field selector.
//! - Own the validation rules shared by add, update and load paths.
//!
//! # Invariants
//! - A `Contact` that passed `validate()` has a non-empty name and category
//!   and a phone of exactly 10 ASCII digits.

pub mod contact;
