//! The `search` CLI command: discover the birth date, fetch and render the
//! grade sheet.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::PortalConfig;
use crate::portal::PortalClient;
use crate::render;

/// Parameters collected from the command line
#[derive(Debug)]
pub struct SearchParams {
    /// Apogee identifier of the student
    pub apogee: String,

    /// Candidate birth years in priority order; empty uses the configured
    /// defaults
    pub years: Vec<i32>,

    /// Upper bound on concurrent probes; `None` uses the configured bound
    pub workers: Option<usize>,

    /// Output format: text, csv, or html
    pub format: String,

    /// Write the grades table as CSV to this path
    pub output: Option<PathBuf>,

    /// Write the grades CSV under the default name in the working directory
    pub save: bool,

    /// Override the portal base URL
    pub base_url: Option<String>,
}

/// Run the search workflow and render the result to stdout
pub async fn search(params: SearchParams) -> Result<()> {
    let mut config = PortalConfig::from_env()?;
    if let Some(base_url) = params.base_url {
        config.base_url = base_url;
    }

    let workers = params.workers.unwrap_or(config.worker_bound);
    let client = PortalClient::new(config)?;

    let report = client
        .find_grades(&params.apogee, &params.years, workers)
        .await?;

    tracing::info!(apogee = %params.apogee, birth_date = %report.birth_date, "student authenticated");

    match params.format.as_str() {
        "csv" => {
            print!("{}", render::to_csv(&report.info));
            println!();
            print!("{}", render::to_csv(&report.grades));
        }
        "html" => {
            println!("{}", render::report_to_html(&report));
        }
        _ => {
            print!("{}", render::to_text(&report.info));
            println!();
            print!("{}", render::to_text(&report.grades));
        }
    }

    let csv_path = params.output.or_else(|| {
        params
            .save
            .then(|| PathBuf::from(render::default_csv_name(&params.apogee, &report.birth_date)))
    });

    if let Some(path) = csv_path {
        std::fs::write(&path, render::to_csv(&report.grades))
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved grades CSV");
    }

    Ok(())
}
