//! Contributor domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted as one ledger row.
//! - Own the structural rules a handle and a display name must satisfy.
//!
//! # Invariants
//! - Entries are append-only: created once, never mutated or deleted here.
//! - Validation happens before any value reaches the ledger engine.

pub mod entry;
pub mod name;
