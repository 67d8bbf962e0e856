// src/github/client.rs
// =============================================================================
// RemoteTree implementation backed by the GitHub REST API.
//
// Endpoints used:
// - GET /repos/{owner}/{repo}/contents/{path}   -> directory listing
// - GET /repos/{owner}/{repo}/git/blobs/{sha}   -> file bytes (base64)
//
// The contents endpoint answers with a JSON array for directories and a
// single JSON object for files, so the response is parsed as either and
// the single-object case becomes NotADirectory.
//
// No auth header is sent: public repositories only.
//
// Rust concepts:
// - #[serde(untagged)]: try each enum variant's shape in order
// - url::Url path segments: percent-encode user-supplied path pieces
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{Entry, EntryKind, RemoteTree};
use crate::config::Config;
use crate::error::{BlogError, Result};

const USER_AGENT: &str = concat!("postcache/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// One element of a contents listing. GitHub sends many more fields
// (urls, size, _links); serde ignores what we don't name.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentEntry>),
    Single(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct Blob {
    content: String,
    encoding: String,
}

pub struct GitHubClient {
    http: Client,
    api_url: Url,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        // One client for every request (connection pooling)
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BlogError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        })
    }

    // Builds {api}/repos/{owner}/{repo}/{section...}/{path...}
    // Empty path pieces are dropped so "" lists the repository root.
    fn endpoint(&self, section: &[&str], path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            // Fails only for URLs like "mailto:x" that have no path at all
            let mut segments = url.path_segments_mut().map_err(|_| {
                BlogError::Config(format!("API URL `{}` cannot take a path", self.api_url))
            })?;
            // pop_if_empty drops the "" a trailing slash leaves behind, so
            // "https://host/api/v3/" doesn't turn into ".../v3//repos"
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str()])
                .extend(section)
                .extend(path.split('/').filter(|piece| !piece.is_empty()));
        } // segments borrows url mutably until here
        Ok(url)
    }

    async fn get(&self, url: Url, resource: &str) -> Result<reqwest::Response> {
        debug!(%url, "GET");

        // Send the request; a failure here means we never got a response
        // (DNS, TLS, timeout, connection reset)
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| BlogError::transport(resource, e))?;

        // Sort the response by status code:
        // - 2xx: hand the body to the caller
        // - 404: the path or sha doesn't exist
        // - anything else (403 rate limit, 5xx): transport problem
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(BlogError::not_found(resource)),
            status => Err(BlogError::transport(resource, format!("HTTP {status}"))),
        }
    }
}

#[async_trait]
impl RemoteTree for GitHubClient {
    async fn list_directory(&self, path: &str) -> Result<Vec<Entry>> {
        let url = self.endpoint(&["contents"], path)?;

        // A body that isn't JSON at all counts as a transport problem too
        let body: ContentsResponse = self
            .get(url, path)
            .await?
            .json()
            .await
            .map_err(|e| BlogError::transport(path, e))?;

        match body {
            // Convert each API entry into our own Entry type
            ContentsResponse::Listing(entries) => Ok(entries
                .into_iter()
                .map(|entry| Entry {
                    kind: EntryKind::from(entry.kind.as_str()),
                    name: entry.name,
                    path: entry.path,
                    content_id: entry.sha,
                })
                .collect()),
            // An object instead of an array: `path` is a file (or symlink)
            ContentsResponse::Single(_) => Err(BlogError::NotADirectory {
                path: path.to_string(),
            }),
        }
    }

    async fn fetch_blob(&self, content_id: &str) -> Result<Vec<u8>> {
        // The blobs endpoint takes the sha exactly like a path segment
        let url = self.endpoint(&["git", "blobs"], content_id)?;
        let blob: Blob = self
            .get(url, content_id)
            .await?
            .json()
            .await
            .map_err(|e| BlogError::transport(content_id, e))?;

        // Undo the transfer encoding so callers get the raw file bytes
        decode_blob(content_id, blob)
    }
}

fn decode_blob(content_id: &str, blob: Blob) -> Result<Vec<u8>> {
    match blob.encoding.as_str() {
        "base64" => {
            // GitHub wraps base64 at 60 columns
            let compact: String = blob
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| BlogError::Decode {
                    resource: content_id.to_string(),
                    detail: e.to_string(),
                })
        }
        // Small text blobs are sometimes sent as-is
        "utf-8" | "utf8" => Ok(blob.content.into_bytes()),
        other => Err(BlogError::Decode {
            resource: content_id.to_string(),
            detail: format!("unsupported encoding `{other}`"),
        }),
    }
}
