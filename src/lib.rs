pub mod config;
pub mod doctor;
pub mod models;
pub mod ollama;
pub mod pipeline;
pub mod search;
pub mod utils;

pub use config::{AgentConfig, AgentConfigBuilder, ConfigError};
pub use models::{InterpretedQuery, PipelineOutcome, Query, QueryError, SearchResult};
pub use ollama::{OllamaClient, OllamaClientBuilder, OllamaClientTrait, OllamaError};
pub use pipeline::{NO_RESULTS_SUMMARY, PipelineError, QueryPipeline};
pub use search::{SearchOrchestrator, SearchProvider, SearxngClient, SearxngClientBuilder};
