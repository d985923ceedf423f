//! SearXNG HTTP client.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{AgentConfig, DEFAULT_SEARCH_TIMEOUT, DEFAULT_SEARXNG_URL};
use crate::models::SearchResult;

/// Errors that can occur when querying SearXNG.
///
/// These never reach the pipeline: [`SearchProvider::search_one_engine`]
/// turns every one of them into an empty result set.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Connection failures, DNS resolution, etc.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-2xx status. SearXNG answers 403 when the JSON format is disabled.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The body was not SearXNG's JSON response shape
    #[error("Malformed search response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl SearchError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }

    /// True when SearXNG refused the `format=json` output.
    pub fn is_json_format_disabled(&self) -> bool {
        matches!(self, Self::Http { status: 403 })
    }
}

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// A source of web results for a single named engine.
pub trait SearchProvider: Send + Sync {
    /// Searches `query` using only `engine`.
    ///
    /// Never fails: transport errors and empty responses both yield an
    /// empty vector, which tells the caller to move on to the next engine.
    fn search_one_engine(&self, query: &str, engine: &str) -> Vec<SearchResult>;
}

/// Builder for [`SearxngClient`].
#[derive(Debug, Default)]
pub struct SearxngClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl SearxngClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder preloaded with the endpoint and timeout of `config`.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new()
            .base_url(config.searxng_url())
            .timeout(config.search_timeout())
    }

    /// Sets the instance root (e.g. "http://127.0.0.1:8888"); `/search` is appended per request.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SearxngClient, SearchError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_SEARXNG_URL.to_string());

        reqwest::Url::parse(&base_url)
            .map_err(|e| SearchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_SEARCH_TIMEOUT))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(SearchError::Network)?;

        Ok(SearxngClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Blocking client for a SearXNG instance's `/search` endpoint.
pub struct SearxngClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl SearxngClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs one English-language, JSON-format search restricted to `engine`.
    pub fn fetch(&self, query: &str, engine: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.get_search(&[
            ("q", query),
            ("format", "json"),
            ("language", "en"),
            ("engines", engine),
        ])
    }

    /// Checks that the instance is reachable and serves JSON results.
    ///
    /// Returns the number of results for a fixed probe query.
    pub fn probe(&self) -> Result<usize, SearchError> {
        self.get_search(&[("q", "searxng"), ("format", "json"), ("language", "en")])
            .map(|results| results.len())
    }

    fn get_search(&self, params: &[(&str, &str)]) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(SearchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(SearchError::from_transport)?;
        parse_search_response(&body)
    }
}

impl SearchProvider for SearxngClient {
    fn search_one_engine(&self, query: &str, engine: &str) -> Vec<SearchResult> {
        match self.fetch(query, engine) {
            Ok(results) => {
                if results.is_empty() {
                    debug!(engine, "engine returned no results");
                }
                results
            }
            Err(e) => {
                warn!(engine, error = %e, "search request failed");
                Vec::new()
            }
        }
    }
}

fn parse_search_response(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    serde_json::from_str::<SearxngResponse>(body)
        .map(|parsed| parsed.results)
        .map_err(SearchError::Decode)
}
