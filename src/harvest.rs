//! High-level pipeline: orchestrates keywords → authenticate → search → download.
//!
//! This module provides the top-level orchestration for a harvest run. It:
//!   - Reads the keyword list from the configured CSV
//!   - Validates the provider credential once, producing a [`Session`]
//!   - Searches once per keyword, strictly in sequence, pausing after each search
//!   - Merges every match into a [`FoundFileSet`] keyed by remote path
//!   - Downloads each unique file into the download folder
//!
//! # Error Handling
//! Nothing here returns an error. An empty keyword list or a failed identity
//! check stops the run early; a failed search or download skips that one
//! keyword or file. The returned [`HarvestReport`] records which path was taken.
//!
//! # Callable From
//! - The CLI (`cli::run`) with a real Dropbox client
//! - Integration tests with `MockStorageProvider`

use crate::config::HarvestConfig;
use crate::contract::StorageProvider;
use crate::download::{download_all, DownloadReport};
use crate::keywords::read_keywords;
use crate::search::{search_files_by_keyword, FoundFileSet};
use crate::session::{authenticate, Session};
use tracing::{info, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestStatus {
    /// The keyword CSV was unreadable or held no keywords.
    NoKeywords,
    /// The identity check failed.
    AuthFailed,
    Completed,
}

#[derive(Debug)]
pub struct HarvestReport {
    pub status: HarvestStatus,
    pub keywords: Vec<String>,
    pub found: FoundFileSet,
    pub downloads: DownloadReport,
}

impl HarvestReport {
    fn stopped(status: HarvestStatus, keywords: Vec<String>) -> Self {
        Self {
            status,
            keywords,
            found: FoundFileSet::new(),
            downloads: DownloadReport::default(),
        }
    }
}

pub async fn harvest<P>(config: &HarvestConfig, provider: P) -> HarvestReport
where
    P: StorageProvider,
{
    info!("[HARVEST] Starting harvest run");

    println!("Reading keywords from {}...", config.keywords_csv.display());
    let keywords = read_keywords(&config.keywords_csv);
    if keywords.is_empty() {
        warn!(csv = %config.keywords_csv.display(), "[HARVEST] No keywords, stopping");
        println!("No keywords found in the CSV file. Exiting.");
        return HarvestReport::stopped(HarvestStatus::NoKeywords, keywords);
    }
    println!("Found {} keywords: {}", keywords.len(), keywords.join(", "));

    let session = match authenticate(provider).await {
        Some(session) => session,
        None => {
            warn!("[HARVEST] Authentication failed, stopping");
            println!("Failed to authenticate with Dropbox. Exiting.");
            return HarvestReport::stopped(HarvestStatus::AuthFailed, keywords);
        }
    };

    let found = search_all(&session, &keywords, config).await;

    let downloads = if found.is_empty() {
        println!("\nNo files found matching any of the keywords.");
        DownloadReport::default()
    } else {
        println!("\nDownloading {} unique files...", found.len());
        download_all(session.provider(), &found, &config.download_dir).await
    };

    println!("\nDownload process completed!");
    info!(
        keywords = keywords.len(),
        unique_files = found.len(),
        succeeded = downloads.succeeded(),
        downloaded = downloads.downloaded(),
        skipped = downloads.skipped(),
        failed = downloads.failed(),
        "[HARVEST] Harvest run completed"
    );

    HarvestReport {
        status: HarvestStatus::Completed,
        keywords,
        found,
        downloads,
    }
}

async fn search_all<P: StorageProvider>(
    session: &Session<P>,
    keywords: &[String],
    config: &HarvestConfig,
) -> FoundFileSet {
    let mut found = FoundFileSet::new();
    for keyword in keywords {
        println!("\nSearching for files matching keyword: '{keyword}'");
        let matches =
            search_files_by_keyword(session.provider(), keyword, &config.search_path).await;

        if matches.is_empty() {
            println!("No files found matching '{keyword}'");
        } else {
            println!("Found {} files matching '{keyword}'", matches.len());
            found.merge(matches);
        }

        tokio::time::sleep(config.search_delay).await;
    }
    found
}
