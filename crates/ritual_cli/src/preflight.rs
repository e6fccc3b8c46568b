//! Environment checks run before the ritual.
//!
//! Independent and stateless; each check reports pass or fail and the run
//! continues only when all pass.

use log::info;
use ritual_core::{FileLedgerRepository, GitHubDirectory, LedgerRepository, RitualConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub label: &'static str,
    pub passed: bool,
}

/// Runs every check; the connectivity probe is skipped without a directory.
pub fn run_checks(config: &RitualConfig, directory: Option<&GitHubDirectory>) -> Vec<Check> {
    let mut checks = vec![Check {
        label: "Git installed",
        passed: which::which("git").is_ok(),
    }];
    if let Some(directory) = directory {
        checks.push(Check {
            label: "Internet connection",
            passed: directory.probe(),
        });
    }
    checks.push(Check {
        label: "Ledger readable",
        passed: FileLedgerRepository::new(&config.ledger_path)
            .load()
            .is_ok(),
    });

    for check in &checks {
        info!(
            "event=preflight module=cli check={:?} passed={}",
            check.label, check.passed
        );
    }
    checks
}

pub fn all_passed(checks: &[Check]) -> bool {
    checks.iter().all(|check| check.passed)
}
