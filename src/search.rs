//! Keyword search runner and the path-keyed set of merged matches.

use std::collections::btree_map::{self, BTreeMap};

use crate::contract::StorageProvider;
use tracing::{debug, error, info};

/// A remote file found by a keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    /// Absolute remote path as displayed by the provider.
    pub path: String,
    /// Final segment of `path`.
    pub name: String,
}

impl FileMatch {
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = basename(&path).to_string();
        Self { path, name }
    }
}

/// Final `/`-separated segment of a remote path.
pub fn basename(remote_path: &str) -> &str {
    remote_path.rsplit('/').next().unwrap_or(remote_path)
}

/// Searches for files matching `keyword` below `scope`.
///
/// Hits without a display path are dropped. A provider failure is reported
/// and yields an empty list so that later keywords still run.
pub async fn search_files_by_keyword<P>(provider: &P, keyword: &str, scope: &str) -> Vec<FileMatch>
where
    P: StorageProvider + ?Sized,
{
    match provider.search(keyword, scope).await {
        Ok(hits) => {
            let total = hits.len();
            let matches: Vec<FileMatch> = hits
                .into_iter()
                .filter_map(|hit| hit.path_display)
                .map(FileMatch::from_path)
                .collect();
            if matches.len() < total {
                debug!(
                    keyword,
                    dropped = total - matches.len(),
                    "Dropped search hits without a display path"
                );
            }
            info!(keyword, scope, count = matches.len(), "Keyword search finished");
            matches
        }
        Err(e) => {
            error!(keyword, scope, error = %e, "Keyword search failed");
            eprintln!("Error searching for files with keyword '{keyword}': {e}");
            Vec::new()
        }
    }
}

/// Matches from every keyword, at most one per remote path.
///
/// Re-inserting a path overwrites the previous entry; which keyword's record
/// survives is unspecified. Iteration order is not part of the contract.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FoundFileSet {
    by_path: BTreeMap<String, FileMatch>,
}

impl FoundFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge<I>(&mut self, matches: I)
    where
        I: IntoIterator<Item = FileMatch>,
    {
        for m in matches {
            self.by_path.insert(m.path.clone(), m);
        }
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, FileMatch> {
        self.by_path.values()
    }
}

impl<'a> IntoIterator for &'a FoundFileSet {
    type Item = &'a FileMatch;
    type IntoIter = btree_map::Values<'a, String, FileMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<FileMatch> for FoundFileSet {
    fn from_iter<I: IntoIterator<Item = FileMatch>>(iter: I) -> Self {
        let mut set = FoundFileSet::new();
        set.merge(iter);
        set
    }
}
