//! Error types for the gradify portal client
//!
//! Each stage of the workflow has its own error enum; [`Error`] aggregates
//! them into the single type the public API returns. Transient probe
//! failures never appear here: they are absorbed by the coordinator and
//! only influence whether a candidate counts as rejected.

use thiserror::Error;

/// Definitive outcomes of an exhausted birth-date search
#[derive(Error, Debug)]
pub enum SearchError {
    /// Every candidate in every supplied year was probed and answered,
    /// but none was accepted
    #[error("no matching birth date across {years_tried} candidate year(s)")]
    NoMatch { years_tried: usize },

    /// Every issued probe died at the transport level; the portal never
    /// produced an HTTP response
    #[error("portal unreachable: {probes} probe(s) failed without an HTTP response")]
    Unreachable { probes: u64 },
}

/// Failures while finalizing the authenticated session
#[derive(Error, Debug)]
pub enum SessionError {
    /// The login replay failed at the transport level
    #[error("login replay failed: {0}")]
    Login(#[source] reqwest::Error),

    /// The login replay came back with an unexpected status class
    #[error("login replay rejected with status {0}")]
    LoginStatus(u16),

    /// The grade sheet request failed at the transport level
    #[error("grade sheet fetch failed: {0}")]
    Fetch(#[source] reqwest::Error),

    /// The grade sheet request came back with an unexpected status class
    #[error("grade sheet fetch rejected with status {0}")]
    FetchStatus(u16),
}

/// Failures while extracting tables from the dossier document
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The expected table structure is absent from the document; distinct
    /// from a table that is present but empty
    #[error("{0} table not found in portal response")]
    StructureNotFound(&'static str),
}

/// Unified error type for the gradify crate
#[derive(Error, Debug)]
pub enum Error {
    /// Search error (no match, portal unreachable)
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Session finalization error
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Table extraction error
    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Configuration errors
    #[error("config error: {0}")]
    Config(String),

    /// HTTP client construction/transport errors outside probing
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
