//! Core use-case services.
//!
//! # Responsibility
//! - Sequence validation, ledger engine and storage into one enrollment.
//! - Keep prompting and presentation out of core.

pub mod enrollment_service;
