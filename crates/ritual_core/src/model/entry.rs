//! Ledger entry domain model.
//!
//! # Responsibility
//! - Normalize and validate directory handles.
//! - Define the contributor record rendered as one table row.
//!
//! # Invariants
//! - `Handle` is always lowercase and matches `[a-z0-9-]+`.
//! - `joined_on` is a calendar date rendered as `YYYY-MM-DD`.

use crate::model::name::accept_display_name;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Calendar format used for the join date column.
pub const JOIN_DATE_FORMAT: &str = "%Y-%m-%d";

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("valid handle regex"));
static PROFILE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[@([A-Za-z0-9-]+)\]\([^)]*\)$").expect("valid profile link regex")
});

/// Validation errors for entry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Handle is empty or contains characters outside `[A-Za-z0-9-]`.
    InvalidHandleFormat(String),
    /// Display name failed structural acceptance.
    NameUnacceptable(String),
    /// Join date is not a valid `YYYY-MM-DD` value.
    InvalidDate(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHandleFormat(value) => write!(f, "invalid handle format: `{value}`"),
            Self::NameUnacceptable(value) => write!(
                f,
                "display name `{value}` needs a first and last name, not just initials"
            ),
            Self::InvalidDate(value) => write!(f, "invalid join date `{value}`; expected YYYY-MM-DD"),
        }
    }
}

impl Error for EntryValidationError {}

/// Case-normalized directory handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    /// Trims and lowercases raw input, then checks the allowed character set.
    pub fn parse(raw: &str) -> Result<Self, EntryValidationError> {
        let normalized = raw.trim().to_ascii_lowercase();
        if !HANDLE_RE.is_match(&normalized) {
            return Err(EntryValidationError::InvalidHandleFormat(normalized));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The `@handle` token used for mentions and duplicate detection.
    pub fn mention(&self) -> String {
        format!("@{}", self.0)
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a `YYYY-MM-DD` join date.
pub fn parse_join_date(raw: &str) -> Result<NaiveDate, EntryValidationError> {
    NaiveDate::parse_from_str(raw.trim(), JOIN_DATE_FORMAT)
        .map_err(|_| EntryValidationError::InvalidDate(raw.trim().to_string()))
}

/// One enrolled contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Unescaped display name; pipe escaping happens at render time.
    pub display_name: String,
    pub handle: Handle,
    pub joined_on: NaiveDate,
}

impl LedgerEntry {
    /// Creates a new entry after running name acceptance.
    ///
    /// The stored display name is the trimmed candidate.
    pub fn new(
        display_name: &str,
        handle: Handle,
        joined_on: NaiveDate,
    ) -> Result<Self, EntryValidationError> {
        Ok(Self {
            display_name: accept_display_name(display_name)?,
            handle,
            joined_on,
        })
    }

    /// Recovers an entry from parsed `Name | GitHub | Join Date` cells.
    ///
    /// Returns `None` for rows that do not carry the `[@handle](url)` link or a
    /// parseable date. Legacy rows are not held to name acceptance.
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        let [name, github, joined] = cells else {
            return None;
        };
        let captures = PROFILE_LINK_RE.captures(github.trim())?;
        let handle = Handle::parse(captures.get(1)?.as_str()).ok()?;
        let joined_on = parse_join_date(joined).ok()?;
        Some(Self {
            display_name: name.trim().to_string(),
            handle,
            joined_on,
        })
    }

    pub fn joined_on_text(&self) -> String {
        self.joined_on.format(JOIN_DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_join_date, EntryValidationError, Handle, LedgerEntry};
    use chrono::NaiveDate;

    #[test]
    fn handle_is_trimmed_and_lowercased() {
        let handle = Handle::parse("  OctoCat-42 ").expect("valid handle");
        assert_eq!(handle.as_str(), "octocat-42");
        assert_eq!(handle.mention(), "@octocat-42");
    }

    #[test]
    fn handle_rejects_foreign_characters() {
        for raw in ["", "   ", "octo cat", "octo_cat", "octo/cat", "ôcto"] {
            assert!(
                matches!(
                    Handle::parse(raw),
                    Err(EntryValidationError::InvalidHandleFormat(_))
                ),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn join_date_requires_iso_calendar_form() {
        assert_eq!(
            parse_join_date("2024-01-01").expect("valid date"),
            NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid ymd")
        );
        assert!(parse_join_date("01/01/2024").is_err());
        assert!(parse_join_date("2024-02-30").is_err());
    }

    #[test]
    fn from_cells_reads_profile_link_and_date() {
        let cells = vec![
            "The Octocat".to_string(),
            "[@OctoCat](https://github.com/octocat)".to_string(),
            "2024-01-01".to_string(),
        ];
        let entry = LedgerEntry::from_cells(&cells).expect("row should parse");
        assert_eq!(entry.handle.as_str(), "octocat");
        assert_eq!(entry.display_name, "The Octocat");
        assert_eq!(entry.joined_on_text(), "2024-01-01");
    }

    #[test]
    fn from_cells_skips_rows_without_profile_link() {
        let cells = vec![
            "Someone".to_string(),
            "someone".to_string(),
            "2024-01-01".to_string(),
        ];
        assert!(LedgerEntry::from_cells(&cells).is_none());
    }
}
