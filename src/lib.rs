//! gradify - Apogée student portal birth-date search and grade retrieval
//!
//! Automates access to a student dossier portal that authenticates with an
//! identifier plus a birth date, discovering the unknown birth date by a
//! bounded concurrent search and then fetching the grade sheet in one
//! authenticated session.
//!
//! # Architecture
//!
//! - [`search`] - candidate enumeration, probing, and the bounded-worker
//!   brute-force coordinator
//! - [`session`] - login replay and protected grade sheet fetch
//! - [`parser`] - table extraction from the dossier document
//! - [`portal`] - the [`portal::PortalClient`] facade front ends call
//! - [`render`] - text/CSV/HTML rendering of extracted tables
//! - [`config`] - portal endpoints, timeouts, and search defaults
//! - [`models`] - core data structures and the shared search state
//!
//! # Example
//!
//! ```no_run
//! use gradify::config::PortalConfig;
//! use gradify::portal::PortalClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PortalClient::new(PortalConfig::from_env()?)?;
//!     let report = client.find_grades("12345", &[2003, 2004], 12).await?;
//!     println!("born {}", report.birth_date);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod portal;
pub mod render;
pub mod search;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::PortalConfig;
    pub use crate::error::{Error, ExtractError, Result, SearchError, SessionError};
    pub use crate::models::{Candidate, GradeReport, ProbeOutcome, SearchState, Table};
    pub use crate::portal::PortalClient;
}

// Direct re-exports for convenience
pub use models::{Candidate, GradeReport, Table};
pub use portal::PortalClient;
