use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gradify::commands::{self, search::SearchParams};

#[derive(Parser)]
#[command(
    name = "gradify",
    version,
    about = "Birth-date discovery and grade retrieval for the Apogée student portal",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover a student's birth date and fetch their grade sheet
    Search {
        /// Apogee identifier of the student
        apogee: String,

        /// Candidate birth years in priority order (defaults to 2001-2007)
        #[arg(short, long, value_delimiter = ',')]
        years: Vec<i32>,

        /// Upper bound on concurrent probes
        #[arg(short, long)]
        workers: Option<usize>,

        /// Output format (text, csv, html)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the grades table as CSV to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the grades CSV under grades_<apogee>_<date>.csv
        #[arg(long, default_value = "false")]
        save: bool,

        /// Override the portal base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Serve the grade lookup over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "10000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Search {
            apogee,
            years,
            workers,
            format,
            output,
            save,
            base_url,
        } => {
            tracing::info!(
                apogee = %apogee,
                years = ?years,
                workers = ?workers,
                "Starting search command"
            );
            commands::search(SearchParams {
                apogee,
                years,
                workers,
                format,
                output,
                save,
                base_url,
            })
            .await?;
        }

        Commands::Serve { host, port } => {
            tracing::info!(host = %host, port = %port, "Starting serve command");
            commands::serve(host, port).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("gradify=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("gradify=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
