//! Core logic for the commit ritual.
//! This crate owns the ledger invariants; the CLI only prompts and reports.

pub mod config;
pub mod identity;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{DirectoryConfig, RitualConfig};
pub use identity::{GitHubDirectory, Identity, IdentityProvider, LookupError};
pub use ledger::{LedgerError, Section, SectionMarkers, Table, TableRow};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{parse_join_date, EntryValidationError, Handle, LedgerEntry};
pub use model::name::{accept_display_name, is_acceptable};
pub use repo::ledger_repo::{
    FileLedgerRepository, InMemoryLedgerRepository, LedgerRepository, RepoError, RepoResult,
};
pub use service::enrollment_service::{
    DuplicateReason, EnrollError, EnrollOutcome, EnrollmentService, ErrorKind,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
