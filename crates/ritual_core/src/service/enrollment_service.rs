//! Enrollment use-case service.
//!
//! # Responsibility
//! - Append one contributor row per successful run.
//! - Report existing enrollment as a successful no-op.
//! - Expose the current roster for display.
//!
//! # Invariants
//! - The ledger is read fresh at the start of every call.
//! - Nothing is written unless section, table and duplicate checks pass.
//! - At most one commit per `enroll` call.

use crate::config::RitualConfig;
use crate::identity::LookupError;
use crate::ledger::{
    append, build_row, commit, locate, parse_table, row_exists, row_present, LedgerError,
    SectionMarkers, Table,
};
use crate::model::entry::{EntryValidationError, Handle, LedgerEntry};
use crate::repo::ledger_repo::{LedgerRepository, RepoError};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable failure categories reported at the orchestration boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DocumentNotFound,
    SectionNotFound,
    TableNotFound,
    InvalidHandleFormat,
    NameUnacceptable,
    DuplicateEntry,
    UpstreamNotFound,
    UpstreamRateLimited,
    UpstreamTransient,
    IoWriteFailure,
}

/// Why an enrollment was skipped as already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateReason {
    /// `@handle` already appears somewhere in the document.
    HandleMentioned,
    /// The exact row text is already in the table.
    RowPresent,
}

/// Successful enrollment outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// A new row was committed.
    Enrolled { entry: LedgerEntry, row: String },
    /// Nothing was written.
    AlreadyEnrolled {
        handle: Handle,
        reason: DuplicateReason,
    },
}

impl EnrollOutcome {
    /// `Some(DuplicateEntry)` for the no-op outcome.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Enrolled { .. } => None,
            Self::AlreadyEnrolled { .. } => Some(ErrorKind::DuplicateEntry),
        }
    }
}

/// Enrollment failures.
#[derive(Debug)]
pub enum EnrollError {
    Validation(EntryValidationError),
    Ledger(LedgerError),
    Repo(RepoError),
    Lookup(LookupError),
}

impl EnrollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(EntryValidationError::NameUnacceptable(_)) => {
                ErrorKind::NameUnacceptable
            }
            Self::Validation(_) => ErrorKind::InvalidHandleFormat,
            Self::Ledger(LedgerError::SectionNotFound { .. }) => ErrorKind::SectionNotFound,
            Self::Ledger(LedgerError::TableNotFound { .. })
            | Self::Ledger(LedgerError::MalformedTable(_))
            | Self::Ledger(LedgerError::SectionOutOfBounds { .. }) => ErrorKind::TableNotFound,
            Self::Ledger(LedgerError::Storage(err)) | Self::Repo(err) => match err {
                RepoError::DocumentNotFound(_) => ErrorKind::DocumentNotFound,
                RepoError::Read { .. } | RepoError::WriteFailure { .. } => {
                    ErrorKind::IoWriteFailure
                }
            },
            Self::Lookup(LookupError::NotFound(_)) => ErrorKind::UpstreamNotFound,
            Self::Lookup(LookupError::RateLimited(_)) => ErrorKind::UpstreamRateLimited,
            Self::Lookup(_) => ErrorKind::UpstreamTransient,
        }
    }
}

impl Display for EnrollError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Ledger(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Lookup(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EnrollError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Ledger(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Lookup(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for EnrollError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<LedgerError> for EnrollError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<RepoError> for EnrollError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<LookupError> for EnrollError {
    fn from(value: LookupError) -> Self {
        Self::Lookup(value)
    }
}

/// Use-case service for ledger enrollment.
pub struct EnrollmentService<R: LedgerRepository> {
    repo: R,
    markers: SectionMarkers,
    profile_base_url: String,
}

impl<R: LedgerRepository> EnrollmentService<R> {
    pub fn new(repo: R, markers: SectionMarkers, profile_base_url: impl Into<String>) -> Self {
        Self {
            repo,
            markers,
            profile_base_url: profile_base_url.into(),
        }
    }

    /// Creates a service using section markers and profile base from `config`.
    pub fn from_config(repo: R, config: &RitualConfig) -> Self {
        Self::new(
            repo,
            config.markers.clone(),
            config.directory.profile_base_url.clone(),
        )
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Whether `handle` is already mentioned anywhere in the ledger.
    ///
    /// Needs only the handle, so callers can skip name resolution for
    /// returning contributors.
    pub fn is_enrolled(&self, handle: &Handle) -> Result<bool, EnrollError> {
        let document = self.repo.load()?;
        locate(&document, &self.markers)?;
        Ok(row_exists(&document, handle))
    }

    /// Appends `handle` to the ledger unless it is already enrolled.
    ///
    /// # Contract
    /// - A missing section or table fails without writing.
    /// - The whole-document mention check runs before name acceptance, so a
    ///   returning handle is a no-op whatever name accompanies it.
    /// - The exact-row check runs after the row is built; either check
    ///   yields `AlreadyEnrolled`.
    pub fn enroll(
        &self,
        handle: &Handle,
        display_name: &str,
        joined_on: NaiveDate,
    ) -> Result<EnrollOutcome, EnrollError> {
        let document = self.repo.load()?;
        let section = locate(&document, &self.markers)?;
        let table_text = section.table_text(&document)?;

        if row_exists(&document, handle) {
            return Ok(self.already_enrolled(handle, DuplicateReason::HandleMentioned));
        }

        let entry = LedgerEntry::new(display_name, handle.clone(), joined_on)?;
        let row = build_row(
            &entry.display_name,
            &entry.handle,
            entry.joined_on,
            &self.profile_base_url,
        );
        if row_present(table_text, &row) {
            return Ok(self.already_enrolled(handle, DuplicateReason::RowPresent));
        }

        let updated_table = append(table_text, &row);
        commit(&self.repo, &document, section, &updated_table)?;
        info!(
            "event=enroll module=service status=ok handle={} joined_on={}",
            handle,
            entry.joined_on_text()
        );
        Ok(EnrollOutcome::Enrolled { entry, row })
    }

    /// Parses the current contributor table.
    pub fn roster(&self) -> Result<Table, EnrollError> {
        let document = self.repo.load()?;
        let section = locate(&document, &self.markers)?;
        Ok(parse_table(section.table_text(&document)?)?)
    }

    fn already_enrolled(&self, handle: &Handle, reason: DuplicateReason) -> EnrollOutcome {
        info!(
            "event=enroll module=service status=duplicate handle={} reason={:?}",
            handle, reason
        );
        EnrollOutcome::AlreadyEnrolled {
            handle: handle.clone(),
            reason,
        }
    }
}
