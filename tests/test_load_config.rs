use keyword_harvest::load_config::{load_config, Overrides, ACCESS_TOKEN_ENV};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

/// A static config file plus the token from the environment produces a full HarvestConfig.
#[test]
#[serial]
fn test_load_config_reads_file_and_injects_token() {
    let config_yaml = r#"
keywords_csv: ./input/keywords.csv
search_path: /Team Folder/Invoices
download_dir: ./tmp/harvest
search_delay_ms: 250
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();
    env::set_var(ACCESS_TOKEN_ENV, "sl.test-token");

    let config = load_config(Some(config_file.path()), Overrides::default()).expect("Config should load");

    assert_eq!(config.keywords_csv, PathBuf::from("./input/keywords.csv"));
    assert_eq!(config.search_path, "/Team Folder/Invoices");
    assert_eq!(config.download_dir, PathBuf::from("./tmp/harvest"));
    assert_eq!(config.search_delay, Duration::from_millis(250));
    assert_eq!(config.access_token, "sl.test-token");
}

#[test]
#[serial]
fn test_load_config_defaults_without_file() {
    env::set_var(ACCESS_TOKEN_ENV, "sl.test-token");

    let config = load_config(None, Overrides::default()).expect("Config should load");

    assert_eq!(config.keywords_csv, PathBuf::from("keywords.csv"));
    assert_eq!(config.search_path, "");
    assert_eq!(config.download_dir, PathBuf::from("downloaded_files"));
    assert_eq!(config.search_delay, Duration::from_secs(1));
}

#[test]
#[serial]
fn test_overrides_win_over_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "search_path: /from-file\ndownload_dir: file-dir\n").unwrap();
    env::set_var(ACCESS_TOKEN_ENV, "sl.test-token");

    let overrides = Overrides {
        search_path: Some("/from-flag".into()),
        search_delay_ms: Some(0),
        ..Overrides::default()
    };
    let config = load_config(Some(config_file.path()), overrides).expect("Config should load");

    assert_eq!(config.search_path, "/from-flag");
    assert_eq!(config.download_dir, PathBuf::from("file-dir"));
    assert_eq!(config.search_delay, Duration::ZERO);
}

/// A missing token is left for the identity check to reject, not a load error.
#[test]
#[serial]
fn test_load_config_leaves_token_empty_when_unset() {
    env::remove_var(ACCESS_TOKEN_ENV);

    let config = load_config(None, Overrides::default()).expect("Config should load");
    assert!(config.access_token.is_empty());
}

#[test]
#[serial]
fn test_token_override_wins_over_environment() {
    env::set_var(ACCESS_TOKEN_ENV, "sl.from-env");

    let overrides = Overrides {
        access_token: Some("  sl.from-flag \n".into()),
        ..Overrides::default()
    };
    let config = load_config(None, overrides).expect("Config should load");
    assert_eq!(config.access_token, "sl.from-flag");
}

#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();
    env::set_var(ACCESS_TOKEN_ENV, "sl.test-token");

    let err = load_config(Some(config_file.path()), Overrides::default()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn test_load_config_rejects_token_in_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "access_token: do-not-commit-me\n").unwrap();
    env::set_var(ACCESS_TOKEN_ENV, "sl.test-token");

    assert!(load_config(Some(config_file.path()), Overrides::default()).is_err());
}
