//! Section locator.
//!
//! Finds the contributor table inside the ledger document by three literal
//! markers: the section heading, the two-line table header that must follow
//! it, and the end marker closing the table.

use crate::ledger::LedgerError;
use log::debug;

/// Heading introducing the contributor section.
pub const DEFAULT_HEADING: &str = "## 🏆 BuffTeks Hall of Fame";
/// Byte-exact column titles and divider expected under the heading.
pub const DEFAULT_TABLE_HEADER: &str = "| Name         | GitHub                                       | Join Date  |\n| ------------ | -------------------------------------------- | ---------- |\n";
/// Literal following the table; the section runs to end of document without it.
pub const DEFAULT_END_MARKER: &str = "\n---";

/// Literal markers describing one known section shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers {
    pub heading: String,
    pub table_header: String,
    pub end_marker: String,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            table_header: DEFAULT_TABLE_HEADER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
        }
    }
}

/// Byte range of the table inside a document.
///
/// `start` points at the table header literal (not the heading); `end` points
/// at the end marker or at the document length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    start: usize,
    end: usize,
}

impl Section {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the table text this section covers in `document`.
    pub fn table_text<'doc>(&self, document: &'doc str) -> Result<&'doc str, LedgerError> {
        document
            .get(self.start..self.end)
            .ok_or(LedgerError::SectionOutOfBounds {
                start: self.start,
                end: self.end,
                len: document.len(),
            })
    }
}

/// Locates the section described by `markers`.
///
/// # Errors
/// - `SectionNotFound` when the heading literal is absent.
/// - `TableNotFound` when no header literal follows the heading.
pub fn locate(document: &str, markers: &SectionMarkers) -> Result<Section, LedgerError> {
    let heading_at = document
        .find(markers.heading.as_str())
        .ok_or_else(|| LedgerError::SectionNotFound {
            heading: markers.heading.clone(),
        })?;

    let table_not_found = || LedgerError::TableNotFound {
        heading: markers.heading.clone(),
    };
    if markers.table_header.is_empty() {
        return Err(table_not_found());
    }
    let start = document[heading_at..]
        .find(markers.table_header.as_str())
        .map(|offset| heading_at + offset)
        .ok_or_else(table_not_found)?;

    let header_end = start + markers.table_header.len();
    let end = if markers.end_marker.is_empty() {
        None
    } else {
        document[header_end..]
            .find(markers.end_marker.as_str())
            .map(|offset| header_end + offset)
    }
    .unwrap_or(document.len());

    debug!(
        "event=ledger_locate module=ledger status=ok start={} end={} len={}",
        start,
        end,
        document.len()
    );
    Ok(Section { start, end })
}
