//! Ledger commit.
//!
//! Splices the updated table into the document at the located offsets and
//! hands the full document to the repository, which replaces the ledger file
//! in one atomic step.

use crate::ledger::section::Section;
use crate::ledger::LedgerError;
use crate::repo::ledger_repo::LedgerRepository;
use log::{error, info};
use std::time::Instant;

/// Returns `document[..start] + updated_table + document[end..]`.
pub fn splice(
    document: &str,
    section: Section,
    updated_table: &str,
) -> Result<String, LedgerError> {
    let out_of_bounds = || LedgerError::SectionOutOfBounds {
        start: section.start(),
        end: section.end(),
        len: document.len(),
    };
    let before = document.get(..section.start()).ok_or_else(out_of_bounds)?;
    let after = document.get(section.end()..).ok_or_else(out_of_bounds)?;
    if section.start() > section.end() {
        return Err(out_of_bounds());
    }

    let mut spliced = String::with_capacity(before.len() + updated_table.len() + after.len());
    spliced.push_str(before);
    spliced.push_str(updated_table);
    spliced.push_str(after);
    Ok(spliced)
}

/// Splices and persists the updated document, returning what was written.
///
/// # Side effects
/// - Exactly one ledger replacement through `repo.commit`.
/// - Emits `ledger_commit` logging events with duration and status.
pub fn commit<R: LedgerRepository + ?Sized>(
    repo: &R,
    document: &str,
    section: Section,
    updated_table: &str,
) -> Result<String, LedgerError> {
    let started_at = Instant::now();
    let updated = splice(document, section, updated_table)?;

    match repo.commit(&updated) {
        Ok(()) => {
            info!(
                "event=ledger_commit module=ledger status=ok location={} bytes_before={} bytes_after={} duration_ms={}",
                repo.location(),
                document.len(),
                updated.len(),
                started_at.elapsed().as_millis()
            );
            Ok(updated)
        }
        Err(err) => {
            error!(
                "event=ledger_commit module=ledger status=error location={} duration_ms={} error_code=write_failed error={}",
                repo.location(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{commit, splice};
    use crate::ledger::section::{locate, SectionMarkers, DEFAULT_TABLE_HEADER};
    use crate::repo::ledger_repo::InMemoryLedgerRepository;

    fn markers() -> SectionMarkers {
        SectionMarkers {
            heading: "## Hall".to_string(),
            ..SectionMarkers::default()
        }
    }

    #[test]
    fn splice_preserves_bytes_outside_section() {
        let document = format!("intro ✨\n## Hall\n{DEFAULT_TABLE_HEADER}\n---\noutro 🎉\n");
        let section = locate(&document, &markers()).expect("section");

        let spliced = splice(&document, section, "REPLACED").expect("in bounds");

        assert_eq!(&spliced[..section.start()], &document[..section.start()]);
        assert!(spliced.ends_with(&document[section.end()..]));
        assert!(spliced.contains("REPLACED\n---\noutro"));
    }

    #[test]
    fn splice_rejects_section_from_longer_document() {
        let long = format!("## Hall\n{DEFAULT_TABLE_HEADER}| x y | z | w |\n---\n");
        let section = locate(&long, &markers()).expect("section");
        assert!(splice("short", section, "table").is_err());
    }

    #[test]
    fn commit_writes_spliced_document_once() {
        let document = format!("## Hall\n{DEFAULT_TABLE_HEADER}\n---\n");
        let repo = InMemoryLedgerRepository::new(document.clone());
        let section = locate(&document, &markers()).expect("section");

        let written = commit(&repo, &document, section, "TABLE").expect("commit succeeds");

        assert_eq!(repo.commit_count(), 1);
        assert_eq!(repo.document().as_deref(), Some(written.as_str()));
        assert_eq!(written, "## Hall\nTABLE\n---\n");
    }
}
