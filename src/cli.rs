///
/// This module implements the CLI interface for keyword-harvest: command
/// parsing, configuration loading and the async `run` entrypoint.
///
/// All pipeline logic lives in [`crate::harvest`]; this module is glue.
/// Use [`run`] with a constructed [`Cli`] for programmatic invocation and
/// integration testing.
use crate::download::ensure_download_dir;
use crate::dropbox::DropboxClient;
use crate::harvest::harvest;
use crate::load_config::{load_config, Overrides};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for keyword-harvest: find Dropbox files by keyword and download them.
#[derive(Parser)]
#[clap(
    name = "keyword-harvest",
    version,
    about = "Search Dropbox for files matching keywords from a CSV and download the unique matches"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for every keyword and download all unique matches
    Fetch {
        /// Optional YAML config file (no secrets; see --token)
        #[clap(long)]
        config: Option<PathBuf>,
        /// CSV file with a header row and one keyword per row
        #[clap(long)]
        keywords: Option<PathBuf>,
        /// Dropbox folder to search below (empty = whole account)
        #[clap(long)]
        search_path: Option<String>,
        /// Local folder to download into
        #[clap(long)]
        download_dir: Option<PathBuf>,
        /// Pause after each keyword search, in milliseconds
        #[clap(long)]
        delay_ms: Option<u64>,
        /// Dropbox access token
        #[clap(long = "token", env = "DROPBOX_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Fetch {
            config,
            keywords,
            search_path,
            download_dir,
            delay_ms,
            access_token,
        } => {
            let overrides = Overrides {
                keywords_csv: keywords,
                search_path,
                download_dir,
                search_delay_ms: delay_ms,
                access_token,
            };
            let config = load_config(config.as_deref(), overrides)?;

            if ensure_download_dir(&config.download_dir).with_context(|| {
                format!(
                    "Failed to create download folder {}",
                    config.download_dir.display()
                )
            })? {
                println!("Created local folder: {}", config.download_dir.display());
            }

            let client = DropboxClient::new(config.access_token.clone());
            let report = harvest(&config, client).await;
            tracing::info!(command = "fetch", status = ?report.status, "Harvest finished");
            Ok(())
        }
    }
}
