//! Ledger section engine.
//!
//! # Responsibility
//! - Locate the contributor section inside the ledger document.
//! - Parse, check and extend the embedded pipe table.
//! - Splice the updated table back and hand the document to storage.
//!
//! # Invariants
//! - Bytes outside `[section.start, section.end)` are never changed.
//! - Existing rows are never reordered, rewritten or removed.
//! - Header and divider lines are taken from the document, never regenerated.

use crate::repo::ledger_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod commit;
pub mod section;
pub mod table;

pub use commit::{commit, splice};
pub use section::{locate, Section, SectionMarkers};
pub use table::{append, build_row, parse_table, row_exists, row_present, Table, TableRow};

/// Errors raised while reading or rewriting the ledger section.
#[derive(Debug)]
pub enum LedgerError {
    /// The section heading literal is absent.
    SectionNotFound { heading: String },
    /// The heading exists but the exact table header literal does not follow it.
    TableNotFound { heading: String },
    /// The table text does not have a header and divider row.
    MalformedTable(String),
    /// Section offsets do not fit the document they are applied to.
    SectionOutOfBounds { start: usize, end: usize, len: usize },
    /// Storage failed while committing the updated document.
    Storage(RepoError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SectionNotFound { heading } => {
                write!(f, "could not locate section `{heading}` in the ledger")
            }
            Self::TableNotFound { heading } => write!(
                f,
                "could not locate the contributor table under `{heading}`; the header row must match exactly"
            ),
            Self::MalformedTable(details) => write!(f, "malformed contributor table: {details}"),
            Self::SectionOutOfBounds { start, end, len } => write!(
                f,
                "section range {start}..{end} does not fit a document of {len} bytes"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LedgerError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}
