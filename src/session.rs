//! Authenticated session finalization
//!
//! After the search confirms a birth date, the login is replayed with
//! redirects enabled so the portal's cookies are materialized, then the
//! grade sheet form is submitted in the same session. The two requests are
//! strictly sequential; the protected endpoint is never contacted before
//! the login replay completes. Unlike probing, a transport failure here is
//! fatal: there is no candidate set left to fall back on.

use std::time::Duration;

use reqwest::{redirect, Client};

use crate::config::PortalConfig;
use crate::error::SessionError;
use crate::models::Candidate;
use crate::search::probe::login_form;

/// Fixed form payload of the grade sheet endpoint
///
/// The parameters are static and known in advance; nothing is derived from
/// the login response.
const GRADE_SHEET_FORM: &[(&str, &str)] = &[
    ("lf_lp", "LICENCE"),
    ("submit", "Afficher"),
    ("cod_cmp", "CFS"),
    ("lic1", "LICENCE"),
    ("cod_cyc", "1"),
    ("session", "1"),
    ("ptjury", "1"),
    ("deug", "D.E.U.G."),
];

/// Replays the winning credential and fetches the protected grade sheet
///
/// Each invocation owns a fresh cookie-carrying client that lives for
/// exactly two requests and is discarded afterwards; sessions are never
/// shared across searches.
pub struct SessionFinalizer {
    login_url: String,
    grades_url: String,
    timeout: Duration,
    user_agent: String,
    accept_invalid_certs: bool,
}

impl SessionFinalizer {
    #[must_use]
    pub fn new(config: &PortalConfig) -> Self {
        Self {
            login_url: config.login_url(),
            grades_url: config.grades_url(),
            timeout: config.finalize_timeout(),
            user_agent: config.user_agent.clone(),
            accept_invalid_certs: config.accept_invalid_certs,
        }
    }

    /// Log in with the confirmed birth date and return the raw grade sheet
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Login`/`LoginStatus` when the login replay
    /// fails and `SessionError::Fetch`/`FetchStatus` when the grade sheet
    /// request fails.
    pub async fn fetch_grade_sheet(
        &self,
        identifier: &str,
        birth_date: Candidate,
    ) -> Result<String, SessionError> {
        let session = Client::builder()
            .timeout(self.timeout)
            .redirect(redirect::Policy::limited(10))
            .cookie_store(true)
            .gzip(true)
            .user_agent(&self.user_agent)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(SessionError::Login)?;

        // Step 1: replay the login with redirects followed so the session
        // cookies are established.
        let response = session
            .post(&self.login_url)
            .form(&login_form(identifier, birth_date))
            .send()
            .await
            .map_err(SessionError::Login)?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(SessionError::LoginStatus(status.as_u16()));
        }

        tracing::debug!(identifier, status = status.as_u16(), "login replay accepted");

        // Step 2: submit the grade sheet form in the authenticated session.
        let response = session
            .post(&self.grades_url)
            .form(GRADE_SHEET_FORM)
            .send()
            .await
            .map_err(SessionError::Fetch)?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(SessionError::FetchStatus(status.as_u16()));
        }

        tracing::debug!(identifier, status = status.as_u16(), "grade sheet retrieved");

        response.text().await.map_err(SessionError::Fetch)
    }
}
