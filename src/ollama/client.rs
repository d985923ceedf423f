/// Ollama HTTP client implementation.
///
/// This module provides `OllamaClient` for making blocking generation requests to the
/// Ollama API, along with its error type and builder.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{AgentConfig, DEFAULT_LLM_TIMEOUT, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};

/// Errors that can occur when interacting with the Ollama API.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The response body was not the JSON we expected
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Ollama API-specific errors
    #[error("Ollama API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl OllamaError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Body of a `POST /api/generate` request.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

/// The part of the generate response we read.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Builder for constructing `OllamaClient` instances.
///
/// # Examples
///
/// ```
/// use askweb::ollama::OllamaClientBuilder;
///
/// let client = OllamaClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .model("llama3.2")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "llama3.2");
/// ```
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl OllamaClientBuilder {
    /// Creates a new `OllamaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder preloaded with the endpoint, model and timeout of `config`.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new()
            .base_url(config.ollama_url())
            .model(config.model())
            .timeout(config.llm_timeout())
    }

    /// Sets the base URL for the Ollama API.
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL (e.g., "http://localhost:11434")
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name sent with every generation request.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the overall request timeout. Local models can be slow, so the default is generous.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `OllamaClient` with the configured settings.
    ///
    /// Unset values fall back to the crate defaults (`http://localhost:11434`,
    /// `llama3.2`, 120 seconds). Environment lookups happen in
    /// [`AgentConfig`](crate::config::AgentConfig), not here.
    ///
    /// # Errors
    ///
    /// Returns `OllamaError::InvalidUrl` if the base URL does not parse, or
    /// `OllamaError::Network` if the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<OllamaClient, OllamaError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout = self.timeout.unwrap_or(DEFAULT_LLM_TIMEOUT);

        reqwest::Url::parse(&base_url)
            .map_err(|e| OllamaError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(OllamaError::Network)?;

        Ok(OllamaClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

/// Blocking HTTP client for the Ollama API.
///
/// It should be constructed using `OllamaClientBuilder`.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

/// Trait for language model generation.
///
/// This trait enables mocking in unit tests and is the only seam the
/// pipeline depends on.
pub trait OllamaClientTrait: Send + Sync {
    /// Generates text for `prompt`.
    ///
    /// `system`, when present, is sent as a separate system instruction and is
    /// never folded into the prompt. An empty string is a successful result.
    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, OllamaError>;
}

impl OllamaClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Lists available models from the Ollama API, sorted by size (largest first).
    pub fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(OllamaError::from_transport)?;

        if !response.status().is_success() {
            return Err(OllamaError::Http {
                status: response.status().as_u16(),
            });
        }

        let json: serde_json::Value = response.json().map_err(OllamaError::Network)?;

        let mut models: Vec<(String, u64)> = json
            .get("models")
            .and_then(|m| m.as_array())
            .map(|models| {
                models
                    .iter()
                    .filter_map(|model| {
                        let name = model.get("name").and_then(|n| n.as_str())?;
                        let size = model.get("size").and_then(|s| s.as_u64()).unwrap_or(0);
                        Some((name.to_string(), size))
                    })
                    .collect()
            })
            .unwrap_or_default();

        models.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(models.into_iter().map(|(name, _)| name).collect())
    }

    fn generate_internal(&self, prompt: &str, system: Option<&str>) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .map_err(OllamaError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OllamaError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(OllamaError::from_transport)?;
        parse_generate_response(&body)
    }
}

impl OllamaClientTrait for OllamaClient {
    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, OllamaError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "calling ollama generate");
        self.generate_internal(prompt, system).inspect_err(|e| {
            warn!(model = %self.model, error = %e, "ollama generate failed");
        })
    }
}

/// Extracts the generated text from a `/api/generate` response body.
fn parse_generate_response(body: &str) -> Result<String, OllamaError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(OllamaError::Serialization)?;

    parsed.response.ok_or_else(|| OllamaError::Api {
        message: "Missing 'response' field in API response".to_string(),
    })
}
