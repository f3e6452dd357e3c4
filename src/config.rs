// keyword-harvest/src/config.rs

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_KEYWORDS_CSV: &str = "keywords.csv";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloaded_files";
/// Pause after each keyword search, to stay under the provider's rate limit.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_secs(1);

/// Everything a harvest run needs, resolved before the run starts.
#[derive(Clone)]
pub struct HarvestConfig {
    pub keywords_csv: PathBuf,
    pub access_token: String,
    /// Remote folder to search below; empty searches the whole account.
    pub search_path: String,
    pub download_dir: PathBuf,
    pub search_delay: Duration,
}

impl HarvestConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            keywords_csv: PathBuf::from(DEFAULT_KEYWORDS_CSV),
            access_token: access_token.into(),
            search_path: String::new(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            search_delay: DEFAULT_SEARCH_DELAY,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            keywords_csv = %self.keywords_csv.display(),
            search_path = %self.search_path,
            download_dir = %self.download_dir.display(),
            search_delay_ms = self.search_delay.as_millis() as u64,
            "Loaded HarvestConfig"
        );
        debug!(?self, "HarvestConfig loaded (full debug)");
    }
}

// The token must never end up in logs.
impl std::fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("keywords_csv", &self.keywords_csv)
            .field("access_token", &format_args!("<{} chars>", self.access_token.len()))
            .field("search_path", &self.search_path)
            .field("download_dir", &self.download_dir)
            .field("search_delay", &self.search_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let config = HarvestConfig::new("sl.secret-token");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sl.secret-token"));
        assert!(rendered.contains("<15 chars>"));
    }
}
