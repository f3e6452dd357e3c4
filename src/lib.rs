#![doc = "keyword-harvest: find files in a Dropbox account by keyword and download the unique matches."]

//! The pipeline runs strictly in sequence:
//! [`keywords`] → [`session`] → [`search`] (one call per keyword, merged into a
//! [`search::FoundFileSet`]) → [`download`]. [`harvest`] wires the steps together
//! against any [`contract::StorageProvider`]; [`dropbox`] is the real one.

pub mod cli;
pub mod config;
pub mod contract;
pub mod download;
pub mod dropbox;
pub mod harvest;
pub mod keywords;
pub mod load_config;
pub mod search;
pub mod session;

pub use cli::{run, Cli, Commands};
