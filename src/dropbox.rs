#![doc = "Dropbox HTTP API v2 client implementing the StorageProvider contract."]
//
//! # Dropbox client
//!
//! Bridges the [`StorageProvider`] trait to the Dropbox HTTP API:
//!
//! - identity check: `POST /2/users/get_current_account`
//! - keyword search: `POST /2/files/search_v2` (first page only)
//! - download: `POST /2/files/download` on the content host, body streamed to disk
//!
//! Construct [`DropboxClient`] with a bearer access token. Construction never
//! touches the network; the token is first used by `current_account`.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::contract::{AccountInfo, ProviderError, SearchHit, StorageProvider};

pub const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";
pub const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";

pub struct DropboxClient {
    http: Client,
    access_token: String,
    api_url: String,
    content_url: String,
}

impl DropboxClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), access_token)
    }

    pub fn with_http_client(http: Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            content_url: DEFAULT_CONTENT_URL.to_string(),
        }
    }

    /// Points the client at different API and content hosts (test servers, proxies).
    pub fn with_base_urls(mut self, api_url: impl Into<String>, content_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self.content_url = content_url.into().trim_end_matches('/').to_string();
        self
    }

    fn rpc(&self, route: &str) -> RequestBuilder {
        self.http
            .post(format!("{}/2/{}", self.api_url, route))
            .bearer_auth(&self.access_token)
    }

    fn content(&self, route: &str) -> RequestBuilder {
        self.http
            .post(format!("{}/2/{}", self.content_url, route))
            .bearer_auth(&self.access_token)
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    account_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<AccountName>,
}

#[derive(Debug, Deserialize)]
struct AccountName {
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    options: SearchOptions<'a>,
}

#[derive(Debug, Serialize)]
struct SearchOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    filename_only: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    matches: Vec<SearchMatch>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct SearchMatch {
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

/// The `metadata` union of a search match; only the `metadata` variant
/// carries a file entry.
#[derive(Debug, Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    metadata: Option<EntryMetadata>,
}

#[derive(Debug, Deserialize)]
struct EntryMetadata {
    #[serde(default)]
    path_display: Option<String>,
}

#[derive(Debug, Serialize)]
struct DownloadArg<'a> {
    path: &'a str,
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
    if status == StatusCode::UNAUTHORIZED {
        Err(ProviderError::Auth(body))
    } else {
        Err(ProviderError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(e: reqwest::Error) -> ProviderError {
    ProviderError::Transport(e.to_string())
}

/// JSON for the `Dropbox-API-Arg` header, which must be pure ASCII.
fn header_safe_json<T: Serialize>(value: &T) -> Result<String, ProviderError> {
    let json = serde_json::to_string(value).map_err(|e| ProviderError::Decode(e.to_string()))?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut buf = [0u16; 2];
            for unit in c.encode_utf16(&mut buf).iter() {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}

#[async_trait]
impl StorageProvider for DropboxClient {
    async fn current_account(&self) -> Result<AccountInfo, ProviderError> {
        if self.access_token.is_empty() {
            return Err(ProviderError::Auth(
                "no access token configured (set DROPBOX_ACCESS_TOKEN or pass --token)".into(),
            ));
        }
        tracing::info!("Checking Dropbox identity");
        let response = self
            .rpc("users/get_current_account")
            .send()
            .await
            .map_err(transport)?;
        let account: AccountResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(AccountInfo {
            account_id: account.account_id,
            email: account.email,
            display_name: account.name.and_then(|n| n.display_name),
        })
    }

    async fn search(&self, query: &str, scope: &str) -> Result<Vec<SearchHit>, ProviderError> {
        let body = SearchRequest {
            query,
            options: SearchOptions {
                path: Some(scope).filter(|s| !s.is_empty()),
                filename_only: true,
            },
        };
        tracing::debug!(query, scope, "Sending Dropbox search request");
        let response = self
            .rpc("files/search_v2")
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let result: SearchResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if result.has_more {
            tracing::warn!(query, "Search has more results than the first page; only the first page is used");
        }

        Ok(result
            .matches
            .into_iter()
            .map(|m| SearchHit {
                path_display: m
                    .metadata
                    .and_then(|outer| outer.metadata)
                    .and_then(|entry| entry.path_display),
            })
            .collect())
    }

    async fn download_to_file(&self, remote_path: &str, local_path: &Path) -> Result<(), ProviderError> {
        let arg = header_safe_json(&DownloadArg { path: remote_path })?;
        let response = self
            .content("files/download")
            .header("Dropbox-API-Arg", arg)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(local_path)
            .await?;

        let written = async {
            let mut stream = response.bytes_stream();
            let mut total: u64 = 0;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(transport)?;
                file.write_all(&chunk).await?;
                total += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<u64, ProviderError>(total)
        }
        .await;

        match written {
            Ok(bytes) => {
                tracing::debug!(remote_path, local_path = %local_path.display(), bytes, "Wrote downloaded file");
                Ok(())
            }
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(local_path).await {
                    tracing::warn!(error = ?rm, local_path = %local_path.display(), "Failed to remove partial download");
                }
                Err(e)
            }
        }
    }
}
