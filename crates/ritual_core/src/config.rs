//! Run configuration defaults.
//!
//! The CLI starts from `RitualConfig::default()` and overrides fields from
//! flags and environment variables.

use crate::ledger::section::SectionMarkers;
use crate::logging::default_log_level;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LEDGER_PATH: &str = "README.md";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_PROFILE_BASE_URL: &str = "https://github.com";
pub const DEFAULT_USER_AGENT: &str = "BuffTeks-Commit-Ritual";

#[derive(Debug, Clone)]
pub struct RitualConfig {
    /// Ledger document, relative paths resolve against the working directory.
    pub ledger_path: PathBuf,
    pub markers: SectionMarkers,
    pub directory: DirectoryConfig,
    pub log_level: String,
    /// Must be absolute.
    pub log_dir: PathBuf,
}

impl Default for RitualConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            markers: SectionMarkers::default(),
            directory: DirectoryConfig::default(),
            log_level: default_log_level().to_string(),
            log_dir: default_log_dir(),
        }
    }
}

/// User directory client settings.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base for `GET {api_base_url}/users/{handle}`.
    pub api_base_url: String,
    /// Base for the profile link rendered into each row.
    pub profile_base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub probe_timeout: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            profile_base_url: DEFAULT_PROFILE_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(3),
        }
    }
}

/// `<system temp>/commit-ritual/logs`.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("commit-ritual").join("logs")
}
