//! Ledger persistence.
//!
//! # Responsibility
//! - Load the ledger document fresh on every call.
//! - Replace the ledger document atomically on commit.
//!
//! # Invariants
//! - No document state is cached between loads.
//! - A failed commit leaves the previous document in place.

pub mod ledger_repo;
