//! # contract: the storage provider capability
//!
//! Everything the harvest pipeline needs from a remote storage account is
//! expressed by the [`StorageProvider`] trait: an identity check, a keyword
//! search and a download-to-file. The Dropbox client in [`crate::dropbox`]
//! implements it for real use; tests use the generated `MockStorageProvider`.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit and integration tests.
//!
//! ## Type Sources
//! - Request and response types are plain data and carry no transport details.

use async_trait::async_trait;
use std::path::Path;

use mockall::automock;

/// Errors surfaced by a [`StorageProvider`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The account behind a validated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// One raw match returned by a provider search.
///
/// `path_display` is absent for matches whose metadata exposes no path
/// (deleted entries, some shared-link results); those are dropped by the
/// search runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path_display: Option<String>,
}

impl SearchHit {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path_display: Some(path.into()),
        }
    }

    pub fn without_path() -> Self {
        Self { path_display: None }
    }
}

/// Trait for the remote storage capabilities used by a harvest run.
///
/// The implementor owns authentication and transport. A single instance is
/// shared by reference for the whole run and must not require mutation.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Lightweight identity check against the current credential.
    async fn current_account(&self) -> Result<AccountInfo, ProviderError>;

    /// Run one search for `query` below `scope` (empty scope = whole account).
    async fn search(&self, query: &str, scope: &str) -> Result<Vec<SearchHit>, ProviderError>;

    /// Write the file at `remote_path` into a new file at `local_path`.
    async fn download_to_file(
        &self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), ProviderError>;
}
