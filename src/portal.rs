//! High-level portal workflow
//!
//! Wires the search, session, and parser stages into the single operation
//! front ends call: discover the birth date, finalize the session, extract
//! the tables. Partial results are never returned: a missing info table
//! fails the whole operation even when the grades table parsed.

use crate::config::PortalConfig;
use crate::error::{Error, Result};
use crate::models::GradeReport;
use crate::parser;
use crate::search::{BirthDateSearch, ProbeClient};
use crate::session::SessionFinalizer;

/// Client for the complete search-login-extract workflow
pub struct PortalClient {
    config: PortalConfig,
}

impl PortalClient {
    /// Create a client, validating the configuration up front
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the configuration is invalid.
    pub fn new(config: PortalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Discover the student's birth date and fetch their grade sheet
    ///
    /// `years` are tried in the given priority order; an empty slice falls
    /// back to the configured default years. `worker_bound` caps the number
    /// of concurrent probes.
    ///
    /// # Errors
    ///
    /// Each failure mode surfaces distinctly: `SearchError::NoMatch`,
    /// `SearchError::Unreachable`, `SessionError::Login*`/`Fetch*`, and
    /// `ExtractError::StructureNotFound` per table.
    pub async fn find_grades(
        &self,
        identifier: &str,
        years: &[i32],
        worker_bound: usize,
    ) -> Result<GradeReport> {
        if identifier.trim().is_empty() {
            return Err(Error::config("identifier must not be empty"));
        }
        if worker_bound == 0 {
            return Err(Error::config("worker bound must be at least 1"));
        }

        let years: Vec<i32> = if years.is_empty() {
            self.config.default_years.clone()
        } else {
            years.to_vec()
        };

        for &year in &years {
            if !(1000..=9999).contains(&year) {
                return Err(Error::config(format!(
                    "year {year} outside the supported 4-digit range"
                )));
            }
        }

        let probe = ProbeClient::new(&self.config)?;
        let search = BirthDateSearch::new(probe, worker_bound);
        let birth_date = search.run(identifier, &years).await?;

        let finalizer = SessionFinalizer::new(&self.config);
        let document = finalizer.fetch_grade_sheet(identifier, birth_date).await?;

        let info = parser::extract_student_info(&document)?;
        let grades = parser::extract_grades(&document)?;

        tracing::info!(
            identifier,
            birth_date = %birth_date,
            info_rows = info.rows.len(),
            grade_rows = grades.rows.len(),
            "grade sheet extracted"
        );

        Ok(GradeReport {
            birth_date,
            info,
            grades,
        })
    }
}
