//! One-shot backend preflight probe.
//!
//! The tracking backend serves HTTP on the same address as the socket
//! endpoint, so a plain GET before connecting turns "backend down" into a
//! precise log line and UI warning. No retries; this runs once at startup.

use crate::error::HealthError;

pub struct BackendHealth {
    client: reqwest::Client,
}

impl BackendHealth {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Probes the HTTP base of the given socket url.
    ///
    /// Any HTTP response at all counts as reachable; only a transport-level
    /// failure is reported.
    ///
    /// # Errors
    ///
    /// Returns `HealthError::InvalidUrl` for an unprobeable url and
    /// `HealthError::Http` when the request cannot reach the backend.
    pub async fn probe(&self, backend_url: &str) -> Result<(), HealthError> {
        let base = http_base(backend_url)?;
        let response = self.client.get(&base).send().await?;
        log::debug!("backend reachable at {base} (HTTP {})", response.status());
        Ok(())
    }
}

impl Default for BackendHealth {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a socket url onto the HTTP base it shares an authority with.
fn http_base(backend_url: &str) -> Result<String, HealthError> {
    let invalid = || HealthError::InvalidUrl {
        raw: backend_url.to_string(),
    };

    let (scheme, rest) = backend_url.split_once("://").ok_or_else(invalid)?;
    let scheme = match scheme {
        "ws" | "http" => "http",
        "wss" | "https" => "https",
        _ => return Err(invalid()),
    };
    let authority = rest.split('/').next().unwrap_or("");
    if authority.is_empty() {
        return Err(invalid());
    }
    Ok(format!("{scheme}://{authority}/"))
}
