//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, history, graph and persistence into one API.
//! - Keep the CLI shell decoupled from storage details.

pub mod contact_book;
