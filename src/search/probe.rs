//! Single authentication probes against the portal login endpoint
//!
//! A probe is one non-redirect-following POST of the login form with a
//! guessed birth date. The response is classified into a [`ProbeOutcome`];
//! transport failures are reported, never raised, so a flaky probe cannot
//! abort a search.

use std::time::Duration;

use reqwest::{redirect, Client};

use crate::config::PortalConfig;
use crate::error::{Error, Result};
use crate::models::{Candidate, ProbeOutcome, SearchState};

/// Build the login form body for an identifier/candidate pair
///
/// Field names and the empty submit marker are the wire contract with the
/// portal's `check.php`.
pub(crate) fn login_form(identifier: &str, candidate: Candidate) -> Vec<(&'static str, String)> {
    vec![
        ("Login", identifier.to_string()),
        ("pass", candidate.wire()),
        ("submit", String::new()),
    ]
}

/// Issues classified authentication probes
///
/// The underlying client never follows redirects: a redirect-class status
/// is exactly the accepted-credential signal. One `ProbeClient` is shared
/// read-mostly by all workers of a coordinator run.
pub struct ProbeClient {
    client: Client,
    login_url: String,
}

impl ProbeClient {
    /// Create a probe client from the portal configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` if the HTTP client cannot be created
    pub fn new(config: &PortalConfig) -> Result<Self> {
        Self::with_timeout(config, config.probe_timeout())
    }

    /// Create a probe client with an explicit per-request timeout
    pub fn with_timeout(config: &PortalConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .cookie_store(true)
            .gzip(true)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            login_url: config.login_url(),
        })
    }

    /// Probe one candidate for `identifier` and classify the outcome
    ///
    /// Short-circuits without touching the network when a winner is
    /// already committed, and aborts the in-flight request if the shared
    /// cancellation token trips mid-probe.
    pub async fn probe(
        &self,
        identifier: &str,
        candidate: Candidate,
        state: &SearchState,
    ) -> ProbeOutcome {
        if state.is_found() {
            return ProbeOutcome::Skipped;
        }

        let request = self
            .client
            .post(&self.login_url)
            .form(&login_form(identifier, candidate))
            .send();

        let response = tokio::select! {
            () = state.cancellation().cancelled() => return ProbeOutcome::Skipped,
            result = request => result,
        };

        match response {
            Ok(response) => {
                state.record_response();
                let status = response.status();
                if status.is_redirection() {
                    ProbeOutcome::Matched
                } else {
                    ProbeOutcome::Rejected(status.as_u16())
                }
            }
            Err(e) => {
                state.record_transport_failure();
                let detail = if e.is_timeout() {
                    "timeout".to_string()
                } else {
                    e.to_string()
                };
                ProbeOutcome::Transient(detail)
            }
        }
    }
}
