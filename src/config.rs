//! Process-wide configuration for the answering pipeline.
//!
//! `AgentConfig` is built once and then passed by reference into every
//! component constructor. Values come from builder calls first, then
//! environment variables, then the defaults below.

use std::time::Duration;

use thiserror::Error;

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default SearXNG endpoint.
pub const DEFAULT_SEARXNG_URL: &str = "http://127.0.0.1:8888";
/// Default generation model.
pub const DEFAULT_MODEL: &str = "llama3.2";
/// Engines tried in order until one returns results.
pub const DEFAULT_ENGINES: [&str; 5] = ["duckduckgo", "brave", "wikipedia", "bing", "google"];
/// Default timeout for a single generation request.
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);
/// Default timeout for a single search request.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
const ENV_SEARXNG_URL: &str = "SEARXNG_URL";
const ENV_SEARCH_ENGINES: &str = "SEARCH_ENGINES";
const ENV_LLM_TIMEOUT: &str = "ASKWEB_LLM_TIMEOUT_SECS";
const ENV_SEARCH_TIMEOUT: &str = "ASKWEB_SEARCH_TIMEOUT_SECS";

/// Errors raised while assembling an `AgentConfig`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An endpoint URL does not parse
    #[error("Invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    /// A timeout variable is not a positive number of seconds
    #[error("Invalid timeout in {name}: {value:?} is not a positive number of seconds")]
    InvalidTimeout { name: &'static str, value: String },

    /// The engine list ended up empty
    #[error("At least one search engine must be configured")]
    NoEngines,
}

/// Immutable configuration shared by the Ollama client, the SearXNG client
/// and the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    ollama_url: String,
    model: String,
    searxng_url: String,
    engines: Vec<String>,
    llm_timeout: Duration,
    search_timeout: Duration,
}

impl AgentConfig {
    /// Builds a configuration from environment variables and defaults only.
    pub fn from_env() -> Result<Self, ConfigError> {
        AgentConfigBuilder::new().build()
    }

    pub fn ollama_url(&self) -> &str {
        &self.ollama_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn searxng_url(&self) -> &str {
        &self.searxng_url
    }

    /// Engines in the order they are tried.
    pub fn engines(&self) -> &[String] {
        &self.engines
    }

    pub fn llm_timeout(&self) -> Duration {
        self.llm_timeout
    }

    pub fn search_timeout(&self) -> Duration {
        self.search_timeout
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            searxng_url: DEFAULT_SEARXNG_URL.to_string(),
            engines: DEFAULT_ENGINES.iter().map(|e| e.to_string()).collect(),
            llm_timeout: DEFAULT_LLM_TIMEOUT,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

/// Builder for `AgentConfig`.
///
/// # Examples
///
/// ```
/// use askweb::AgentConfigBuilder;
///
/// let config = AgentConfigBuilder::new()
///     .ollama_url("http://localhost:11434")
///     .searxng_url("http://localhost:8080")
///     .model("llama3.2")
///     .engines(["brave", "wikipedia"])
///     .build()
///     .unwrap();
/// assert_eq!(config.engines(), ["brave", "wikipedia"]);
/// ```
#[derive(Debug, Default)]
pub struct AgentConfigBuilder {
    ollama_url: Option<String>,
    model: Option<String>,
    searxng_url: Option<String>,
    engines: Option<Vec<String>>,
    llm_timeout: Option<Duration>,
    search_timeout: Option<Duration>,
}

impl AgentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ollama_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_url = Some(url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn searxng_url(mut self, url: impl Into<String>) -> Self {
        self.searxng_url = Some(url.into());
        self
    }

    /// Replaces the engine list. Order is preserved.
    pub fn engines<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engines = Some(engines.into_iter().map(Into::into).collect());
        self
    }

    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = Some(timeout);
        self
    }

    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = Some(timeout);
        self
    }

    /// Resolves every field (builder value, then environment, then default)
    /// and validates the result.
    pub fn build(self) -> Result<AgentConfig, ConfigError> {
        let defaults = AgentConfig::default();

        let ollama_url = self
            .ollama_url
            .or_else(|| env_non_empty(ENV_OLLAMA_HOST))
            .map(normalize_ollama_host)
            .unwrap_or(defaults.ollama_url);
        validate_url(ENV_OLLAMA_HOST, &ollama_url)?;

        let searxng_url = self
            .searxng_url
            .or_else(|| env_non_empty(ENV_SEARXNG_URL))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.searxng_url);
        validate_url(ENV_SEARXNG_URL, &searxng_url)?;

        let model = self
            .model
            .or_else(|| env_non_empty(ENV_OLLAMA_MODEL))
            .unwrap_or(defaults.model);

        let engines = match self.engines {
            Some(engines) => clean_engines(engines),
            None => match env_non_empty(ENV_SEARCH_ENGINES) {
                Some(list) => parse_engine_list(&list),
                None => defaults.engines,
            },
        };
        if engines.is_empty() {
            return Err(ConfigError::NoEngines);
        }

        let llm_timeout = match self.llm_timeout {
            Some(timeout) => timeout,
            None => env_timeout(ENV_LLM_TIMEOUT)?.unwrap_or(defaults.llm_timeout),
        };
        let search_timeout = match self.search_timeout {
            Some(timeout) => timeout,
            None => env_timeout(ENV_SEARCH_TIMEOUT)?.unwrap_or(defaults.search_timeout),
        };

        Ok(AgentConfig {
            ollama_url,
            model,
            searxng_url,
            engines,
            llm_timeout,
            search_timeout,
        })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_timeout(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = env_non_empty(name) else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(ConfigError::InvalidTimeout { name, value }),
    }
}

/// `OLLAMA_HOST` is commonly set as a bare `host:port` for the Ollama server itself.
fn normalize_ollama_host(host: String) -> String {
    let host = host.trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

fn validate_url(name: &'static str, url: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            name,
            reason: format!("{url}: {e}"),
        })
}

/// Splits a comma-separated engine list, dropping blanks and duplicates.
pub fn parse_engine_list(input: &str) -> Vec<String> {
    clean_engines(input.split(','))
}

fn clean_engines<I, S>(engines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for engine in engines {
        let engine = engine.as_ref().trim().to_lowercase();
        if !engine.is_empty() && !cleaned.contains(&engine) {
            cleaned.push(engine);
        }
    }
    cleaned
}
