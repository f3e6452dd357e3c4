//! Keyword source: reads search terms from the first column of a CSV file.

use std::path::Path;
use tracing::{error, info};

/// Reads keywords from a CSV file, discarding the header row.
///
/// Blank lines are skipped; every other row contributes its trimmed first
/// column (possibly empty) in file order. Any read or parse failure is
/// reported and yields an empty list, so callers check for emptiness rather
/// than handle an error.
pub fn read_keywords<P: AsRef<Path>>(csv_path: P) -> Vec<String> {
    let path = csv_path.as_ref();
    match try_read_keywords(path) {
        Ok(keywords) => {
            info!(csv_path = %path.display(), count = keywords.len(), "Read keywords from CSV");
            keywords
        }
        Err(e) => {
            error!(error = %e, csv_path = %path.display(), "Failed to read keywords CSV");
            eprintln!("Error reading CSV file: {e}");
            Vec::new()
        }
    }
}

fn try_read_keywords(path: &Path) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut keywords = Vec::new();
    for record in reader.records() {
        let record = record?;
        keywords.push(record.get(0).unwrap_or("").trim().to_string());
    }
    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::tempdir;

    #[test]
    fn reads_first_column_after_header() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("keywords.csv");
        write(&csv, "keyword,comment\n invoice ,monthly\nreport,\n").unwrap();

        assert_eq!(read_keywords(&csv), vec!["invoice", "report"]);
    }

    #[test]
    fn blank_lines_are_dropped_not_counted() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("keywords.csv");
        write(&csv, "keyword\n\nalpha\n\n\nbeta\ngamma\n\n").unwrap();

        assert_eq!(read_keywords(&csv), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn row_with_blank_first_cell_still_counts() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("keywords.csv");
        write(&csv, "keyword,note\ninvoice,a\n,b\n   ,c\nreport,d\n").unwrap();

        assert_eq!(read_keywords(&csv), vec!["invoice", "", "", "report"]);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("keywords.csv");
        write(&csv, "keyword\nb\na\nb\n").unwrap();

        assert_eq!(read_keywords(&csv), vec!["b", "a", "b"]);
    }

    #[test]
    fn header_only_file_yields_nothing() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("keywords.csv");
        write(&csv, "keyword\n").unwrap();

        assert!(read_keywords(&csv).is_empty());
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let dir = tempdir().unwrap();
        assert!(read_keywords(dir.path().join("nope.csv")).is_empty());
    }

    #[test]
    fn invalid_utf8_yields_empty_list() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("keywords.csv");
        write(&csv, b"keyword\n\xff\xfe\n").unwrap();

        assert!(read_keywords(&csv).is_empty());
    }
}
