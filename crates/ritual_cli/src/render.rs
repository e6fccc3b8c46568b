//! Terminal text for the ritual: banner, check list, roster table.

use crate::preflight::Check;
use ritual_core::Table;
use std::io::{self, Write};
use tabwriter::TabWriter;

pub const BANNER: &str = "
🐃 BuffTeks Commit Ritual
────────────────────────────────────────
Welcome to the digital rite of passage.
Every contribution is part of our legacy.
────────────────────────────────────────
Commit to Learn, Commit to Code, Commit to BuffTeks!
";

pub const PUSH_REMINDER: &str = "
💾 Remember: commit your changes and push them to GitHub!
  git add .
  git commit -m 'Commit: Contributed to BuffTeks'
  git push
";

/// Aligned `CHECK  STATUS` list.
pub fn checks(checks: &[Check]) -> io::Result<String> {
    let mut tw = TabWriter::new(Vec::new()).padding(2);
    writeln!(tw, "CHECK\tSTATUS")?;
    for check in checks {
        let status = if check.passed { "✅" } else { "❌" };
        writeln!(tw, "{}\t{}", check.label, status)?;
    }
    into_string(tw)
}

/// The contributor table as aligned columns, rows in ledger order.
pub fn roster(table: &Table) -> io::Result<String> {
    let mut tw = TabWriter::new(Vec::new()).padding(2);
    writeln!(tw, "🏆 BuffTeks Hall of Fame")?;
    writeln!(tw, "{}", table.columns.join("\t"))?;
    for row in &table.rows {
        writeln!(tw, "{}", row.cells.join("\t"))?;
    }
    into_string(tw)
}

fn into_string(mut tw: TabWriter<Vec<u8>>) -> io::Result<String> {
    tw.flush()?;
    let bytes = tw
        .into_inner()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
