//! Deduplicating downloader: fetches every unique match into a local folder.
//!
//! Each file ends in exactly one terminal state (see [`DownloadOutcome`]).
//! A file already present locally counts as success, so re-running over the
//! same [`FoundFileSet`] and folder is idempotent. A failed transfer is
//! reported and never stops the batch; there are no retries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::contract::StorageProvider;
use crate::search::{basename, FoundFileSet};
use tracing::{debug, error, info};

/// Terminal state of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    Skipped,
    Failed(String),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DownloadOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownloadReport {
    pub remote_path: String,
    pub local_path: PathBuf,
    pub outcome: DownloadOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub files: Vec<FileDownloadReport>,
}

impl DownloadReport {
    /// Files that are present locally after the run, fetched or already there.
    pub fn succeeded(&self) -> usize {
        self.count(DownloadOutcome::is_success)
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Downloaded))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&DownloadOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Creates the download folder (and parents) if it does not exist yet.
///
/// Returns `true` when the folder was created by this call.
pub fn ensure_download_dir<P: AsRef<Path>>(dir: P) -> io::Result<bool> {
    let dir = dir.as_ref();
    if dir.exists() {
        debug!(path = %dir.display(), "Download folder already present");
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|e| {
        error!(error = ?e, path = %dir.display(), "Failed to create download folder");
        e
    })?;
    info!(path = %dir.display(), "Created download folder");
    Ok(true)
}

/// Downloads one remote file into `dest_dir`, named after its basename.
pub async fn download_file<P>(provider: &P, remote_path: &str, dest_dir: &Path) -> FileDownloadReport
where
    P: StorageProvider + ?Sized,
{
    let name = basename(remote_path);
    let local_path = dest_dir.join(name);

    let outcome = if local_path.exists() {
        info!(remote_path, local_path = %local_path.display(), "Local file exists, skipping");
        println!("File '{name}' already exists locally. Skipping.");
        DownloadOutcome::Skipped
    } else {
        println!(
            "Downloading '{remote_path}' to '{}'...",
            local_path.display()
        );
        match provider.download_to_file(remote_path, &local_path).await {
            Ok(()) => {
                info!(remote_path, local_path = %local_path.display(), "Downloaded file");
                println!("Successfully downloaded '{name}'");
                DownloadOutcome::Downloaded
            }
            Err(e) => {
                error!(remote_path, local_path = %local_path.display(), error = %e, "Download failed");
                eprintln!("Error downloading file '{remote_path}': {e}");
                DownloadOutcome::Failed(e.to_string())
            }
        }
    };

    FileDownloadReport {
        remote_path: remote_path.to_string(),
        local_path,
        outcome,
    }
}

/// Attempts every entry of `found` exactly once, in sequence.
pub async fn download_all<P>(provider: &P, found: &FoundFileSet, dest_dir: &Path) -> DownloadReport
where
    P: StorageProvider + ?Sized,
{
    let mut report = DownloadReport::default();
    for file in found {
        report
            .files
            .push(download_file(provider, &file.path, dest_dir).await);
    }
    info!(
        total = report.files.len(),
        succeeded = report.succeeded(),
        downloaded = report.downloaded(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Download batch finished"
    );
    report
}
