//! Contributor table parser and row builder.
//!
//! # Responsibility
//! - Render a new contributor row with escaped cells.
//! - Detect existing enrollment through two independent checks.
//! - Append rows to the table text without touching existing lines.
//! - Parse rows back into cells for roster display.
//!
//! # Invariants
//! - Duplicate detection never reports "absent" for a handle mentioned anywhere
//!   in the document.
//! - `append` output is the trimmed table, one newline, then the new row.

use crate::ledger::LedgerError;
use crate::model::entry::{Handle, LedgerEntry, JOIN_DATE_FORMAT};
use chrono::NaiveDate;

/// Escapes a value for one table cell.
///
/// Pipes gain a backslash prefix. Line breaks would split the row, so they
/// collapse to single spaces.
pub fn escape_cell(value: &str) -> String {
    value
        .trim()
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

/// Renders `| {name} | [@{handle}]({profile_base}/{handle}) | {date} |\n`.
pub fn build_row(
    display_name: &str,
    handle: &Handle,
    joined_on: NaiveDate,
    profile_base_url: &str,
) -> String {
    format!(
        "| {name} | [@{handle}]({base}/{handle}) | {date} |\n",
        name = escape_cell(display_name),
        base = profile_base_url.trim_end_matches('/'),
        date = joined_on.format(JOIN_DATE_FORMAT),
    )
}

/// Whole-document check: `@handle` appears anywhere, ignoring case.
///
/// Deliberately broad; a handle referenced outside the table still counts as
/// enrolled.
pub fn row_exists(document: &str, handle: &Handle) -> bool {
    document.to_lowercase().contains(&handle.mention())
}

/// Table-only check: the exact rendered row is already present.
pub fn row_present(table_text: &str, row_text: &str) -> bool {
    let needle = row_text.trim();
    !needle.is_empty() && table_text.contains(needle)
}

/// Appends `row_text` after the last non-whitespace byte of `table_text`.
pub fn append(table_text: &str, row_text: &str) -> String {
    let existing = table_text.trim_end();
    let mut updated = String::with_capacity(existing.len() + row_text.len() + 1);
    updated.push_str(existing);
    updated.push('\n');
    updated.push_str(row_text);
    updated
}

/// One parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Trimmed, unescaped cell values.
    pub cells: Vec<String>,
}

impl TableRow {
    /// Interprets the row as a ledger entry when it has the canonical shape.
    pub fn entry(&self) -> Option<LedgerEntry> {
        LedgerEntry::from_cells(&self.cells)
    }
}

/// Parsed contributor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    /// Data rows in document order.
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.rows.iter().filter_map(TableRow::entry).collect()
    }
}

/// Parses table text into column titles and data rows.
///
/// Parsing stops at the first line after the divider that is not a pipe row.
///
/// # Errors
/// - `MalformedTable` when the header or divider line is missing or misshapen.
pub fn parse_table(table_text: &str) -> Result<Table, LedgerError> {
    let mut lines = table_text.lines().map(str::trim).skip_while(|line| line.is_empty());

    let header = lines
        .next()
        .filter(|line| line.starts_with('|'))
        .ok_or_else(|| LedgerError::MalformedTable("missing header row".to_string()))?;
    let columns = split_cells(header);

    let divider = lines
        .next()
        .ok_or_else(|| LedgerError::MalformedTable("missing divider row".to_string()))?;
    if !is_divider(divider) {
        return Err(LedgerError::MalformedTable(format!(
            "expected divider row, found `{divider}`"
        )));
    }

    let rows = lines
        .take_while(|line| line.starts_with('|'))
        .map(|line| TableRow {
            cells: split_cells(line),
        })
        .collect();

    Ok(Table { columns, rows })
}

fn is_divider(line: &str) -> bool {
    let cells = split_cells(line);
    line.starts_with('|')
        && !cells.is_empty()
        && cells.iter().all(|cell| {
            !cell.is_empty() && cell.contains('-') && cell.chars().all(|c| matches!(c, '-' | ':'))
        })
}

/// Splits one pipe row on unescaped `|`, unescaping `\|` inside cells.
fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = if inner.ends_with('|') && !inner.ends_with("\\|") {
        &inner[..inner.len() - 1]
    } else {
        inner
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                current.push('|');
            }
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            other => current.push(other),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

#[cfg(test)]
mod tests {
    use super::{append, build_row, parse_table, row_exists, row_present, split_cells};
    use crate::ledger::section::DEFAULT_TABLE_HEADER;
    use crate::ledger::LedgerError;
    use crate::model::entry::Handle;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    fn handle(raw: &str) -> Handle {
        Handle::parse(raw).expect("valid handle")
    }

    #[test]
    fn build_row_lowercases_handle_and_escapes_pipes() {
        let row = build_row("Jane | Doe", &handle("JaneDoe"), date(), "https://github.com/");
        assert_eq!(
            row,
            "| Jane \\| Doe | [@janedoe](https://github.com/janedoe) | 2024-01-01 |\n"
        );
    }

    #[test]
    fn escaped_row_round_trips_through_parser() {
        let row = build_row("Jane | Doe", &handle("janedoe"), date(), "https://github.com");
        let table = parse_table(&format!("{DEFAULT_TABLE_HEADER}{row}")).expect("parses");

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[0], "Jane | Doe");
        let entry = table.rows[0].entry().expect("canonical row");
        assert_eq!(entry.display_name, "Jane | Doe");
        assert_eq!(entry.handle.as_str(), "janedoe");
    }

    #[test]
    fn row_exists_matches_mentions_anywhere_ignoring_case() {
        let document = "Thanks to @OctoCat for the idea.\n";
        assert!(row_exists(document, &handle("octocat")));
        assert!(!row_exists(document, &handle("hubot")));
    }

    #[test]
    fn row_present_checks_exact_rendered_row() {
        let row = build_row("The Octocat", &handle("octocat"), date(), "https://github.com");
        let table = format!("{DEFAULT_TABLE_HEADER}{row}");
        assert!(row_present(&table, &row));

        let other_day = build_row(
            "The Octocat",
            &handle("octocat"),
            NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"),
            "https://github.com",
        );
        assert!(!row_present(&table, &other_day));
    }

    #[test]
    fn append_to_empty_table_has_no_blank_line() {
        let row = build_row("The Octocat", &handle("octocat"), date(), "https://github.com");
        let updated = append(&format!("{DEFAULT_TABLE_HEADER}\n\n"), &row);
        assert_eq!(updated, format!("{DEFAULT_TABLE_HEADER}{row}"));
        assert!(!updated.contains("\n\n"));
    }

    #[test]
    fn append_keeps_existing_rows_in_order() {
        let first = build_row("Ann Li", &handle("annli"), date(), "https://github.com");
        let second = build_row("Bob Ray", &handle("bobray"), date(), "https://github.com");
        let updated = append(&format!("{DEFAULT_TABLE_HEADER}{first}"), &second);

        let table = parse_table(&updated).expect("parses");
        let handles: Vec<String> = table
            .entries()
            .into_iter()
            .map(|entry| entry.handle.to_string())
            .collect();
        assert_eq!(handles, vec!["annli", "bobray"]);
    }

    #[test]
    fn parse_table_reads_columns_and_stops_at_prose() {
        let text = format!(
            "{DEFAULT_TABLE_HEADER}| Ann Li | [@annli](https://github.com/annli) | 2023-05-06 |\n\nSome closing words.\n"
        );
        let table = parse_table(&text).expect("parses");
        assert_eq!(table.columns, vec!["Name", "GitHub", "Join Date"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn parse_table_rejects_missing_divider() {
        let err = parse_table("| Name | GitHub |\n| Ann Li | x |\n").expect_err("no divider");
        assert!(matches!(err, LedgerError::MalformedTable(_)));
    }

    #[test]
    fn split_cells_keeps_trailing_escaped_pipe() {
        assert_eq!(split_cells("| a\\| | b |"), vec!["a|", "b"]);
    }
}
