//! Identity lookup against a public user directory.
//!
//! # Responsibility
//! - Resolve a handle to a confirmed login and an optional display name.
//! - Classify upstream failures into terminal and transient outcomes.
//!
//! # Invariants
//! - No automatic retry; a transient failure ends the lookup.
//! - A confirmed handle without a public name is an outcome, not an error.

use crate::model::entry::Handle;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod github;

pub use github::GitHubDirectory;

/// Successful lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Handle exists and publishes a display name.
    Named { login: String, name: String },
    /// Handle exists but no display name is available.
    Anonymous { login: String },
}

impl Identity {
    /// Builds an identity from a login and a possibly blank name.
    pub fn from_profile(login: impl Into<String>, name: Option<&str>) -> Self {
        let login = login.into();
        match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => Self::Named {
                login,
                name: name.to_string(),
            },
            None => Self::Anonymous { login },
        }
    }

    pub fn login(&self) -> &str {
        match self {
            Self::Named { login, .. } | Self::Anonymous { login } => login,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::Anonymous { .. } => None,
        }
    }
}

/// Lookup failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The directory has no such handle (404).
    NotFound(String),
    /// The directory throttled the request (403/429).
    RateLimited(u16),
    /// Network error, timeout or unreadable response.
    Transient(String),
    /// Any other upstream status.
    Upstream(u16),
    /// The HTTP client could not be constructed.
    Client(String),
}

impl LookupError {
    /// Whether re-running later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Transient(_))
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(handle) => write!(f, "user `{handle}` not found in the directory"),
            Self::RateLimited(status) => {
                write!(f, "directory rate limit reached (status {status}); try again later")
            }
            Self::Transient(message) => write!(f, "network or directory error: {message}"),
            Self::Upstream(status) => write!(f, "directory returned status {status}"),
            Self::Client(message) => write!(f, "failed to build directory client: {message}"),
        }
    }
}

impl Error for LookupError {}

/// Resolves handles to identities.
pub trait IdentityProvider {
    fn lookup(&self, handle: &Handle) -> Result<Identity, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::{Identity, LookupError};

    #[test]
    fn blank_name_is_anonymous() {
        assert_eq!(
            Identity::from_profile("octocat", Some("   ")),
            Identity::Anonymous {
                login: "octocat".to_string()
            }
        );
        assert_eq!(Identity::from_profile("octocat", None).display_name(), None);
    }

    #[test]
    fn named_profile_is_trimmed() {
        let identity = Identity::from_profile("octocat", Some(" The Octocat "));
        assert_eq!(identity.display_name(), Some("The Octocat"));
        assert_eq!(identity.login(), "octocat");
    }

    #[test]
    fn only_rate_limit_and_network_errors_are_transient() {
        assert!(LookupError::RateLimited(429).is_transient());
        assert!(LookupError::Transient("timeout".to_string()).is_transient());
        assert!(!LookupError::NotFound("x".to_string()).is_transient());
        assert!(!LookupError::Upstream(500).is_transient());
    }
}
