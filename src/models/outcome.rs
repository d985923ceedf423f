use serde::Serialize;

use super::{InterpretedQuery, SearchResult};

/// Number of results kept in a [`PipelineOutcome`] and used as grounding context.
pub const MAX_RESULTS: usize = 5;

/// The complete answer to one query.
///
/// Built once at the end of a successful pipeline run and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    summary: String,
    search_query: InterpretedQuery,
    results: Vec<SearchResult>,
}

impl PipelineOutcome {
    /// Assembles an outcome, keeping at most the first [`MAX_RESULTS`] results.
    pub fn new(
        summary: String,
        search_query: InterpretedQuery,
        mut results: Vec<SearchResult>,
    ) -> Self {
        results.truncate(MAX_RESULTS);
        Self {
            summary,
            search_query,
            results,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn search_query(&self) -> &InterpretedQuery {
        &self.search_query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }
}
