//! Ordered engine fallback.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::DEFAULT_ENGINES;
use crate::models::SearchResult;

use super::SearchProvider;

/// Tries engines one at a time, in a fixed order, until one returns results.
///
/// Results from different engines are never merged and each engine gets
/// exactly one attempt per [`search`](Self::search) call.
pub struct SearchOrchestrator {
    provider: Arc<dyn SearchProvider>,
    engines: Vec<String>,
}

impl SearchOrchestrator {
    /// Creates an orchestrator over [`DEFAULT_ENGINES`].
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self::with_engines(provider, DEFAULT_ENGINES)
    }

    /// Creates an orchestrator with a custom engine order.
    pub fn with_engines<I, S>(provider: Arc<dyn SearchProvider>, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provider,
            engines: engines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn engines(&self) -> &[String] {
        &self.engines
    }

    /// Returns the results of the first engine that has any, or an empty
    /// vector once every engine has been tried.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let found = self.engines.iter().find_map(|engine| {
            info!(engine = %engine, "trying engine");
            let results = self.provider.search_one_engine(query, engine);
            if results.is_empty() {
                None
            } else {
                debug!(engine = %engine, count = results.len(), "engine returned results");
                Some(results)
            }
        });

        found.unwrap_or_else(|| {
            info!(engines = self.engines.len(), "no engine returned results");
            Vec::new()
        })
    }
}
