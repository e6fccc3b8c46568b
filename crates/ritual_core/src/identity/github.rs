//! GitHub-compatible user directory client.
//!
//! Issues `GET {api_base}/users/{handle}` over a blocking client with a fixed
//! timeout and an identifying `User-Agent`.

use crate::config::DirectoryConfig;
use crate::identity::{Identity, IdentityProvider, LookupError};
use crate::model::entry::Handle;
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Public profile fields the ledger needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl UserProfile {
    pub fn into_identity(self) -> Identity {
        Identity::from_profile(self.login, self.name.as_deref())
    }
}

/// Directory client backed by the GitHub users API.
#[derive(Debug, Clone)]
pub struct GitHubDirectory {
    client: Client,
    api_base_url: String,
    probe_timeout: Duration,
}

impl GitHubDirectory {
    /// Builds a client from directory configuration.
    ///
    /// # Errors
    /// - `LookupError::Client` when the HTTP client cannot be initialized.
    pub fn new(config: &DirectoryConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| LookupError::Client(err.to_string()))?;
        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            probe_timeout: config.probe_timeout,
        })
    }

    /// Connectivity probe: any HTTP response from the API base counts as reachable.
    pub fn probe(&self) -> bool {
        match self
            .client
            .head(self.api_base_url.as_str())
            .timeout(self.probe_timeout)
            .send()
        {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    "event=directory_probe module=identity status=error error={}",
                    err
                );
                false
            }
        }
    }
}

impl IdentityProvider for GitHubDirectory {
    fn lookup(&self, handle: &Handle) -> Result<Identity, LookupError> {
        let started_at = Instant::now();
        let endpoint = format!("{}/users/{}", self.api_base_url, handle);

        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .map_err(|err| {
                warn!(
                    "event=directory_lookup module=identity status=error handle={} timeout={} error={}",
                    handle,
                    err.is_timeout(),
                    err
                );
                LookupError::Transient(err.to_string())
            })?;

        let status = response.status().as_u16();
        if let Some(err) = classify_status(status, handle) {
            warn!(
                "event=directory_lookup module=identity status=error handle={} http_status={} duration_ms={}",
                handle,
                status,
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }

        let profile: UserProfile = response
            .json()
            .map_err(|err| LookupError::Transient(format!("unreadable profile: {err}")))?;
        let identity = profile.into_identity();
        info!(
            "event=directory_lookup module=identity status=ok handle={} named={} duration_ms={}",
            handle,
            identity.display_name().is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(identity)
    }
}

/// Maps a non-success status to its lookup error; `None` for 200.
pub fn classify_status(status: u16, handle: &Handle) -> Option<LookupError> {
    match status {
        200 => None,
        403 | 429 => Some(LookupError::RateLimited(status)),
        404 => Some(LookupError::NotFound(handle.to_string())),
        other => Some(LookupError::Upstream(other)),
    }
}
