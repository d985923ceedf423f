/// Ollama HTTP client module.
///
/// This module provides a blocking HTTP client for the Ollama generate API,
/// including error handling and timeout configuration.
mod client;

pub use client::{OllamaClient, OllamaClientBuilder, OllamaClientTrait, OllamaError};
