//! Interpret, search, summarize.

use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::config::AgentConfig;
use crate::models::{InterpretedQuery, PipelineOutcome, Query, SearchResult};
use crate::ollama::{OllamaClientBuilder, OllamaClientTrait};
use crate::search::{SearchOrchestrator, SearxngClientBuilder};

use super::error::PipelineError;
use super::prompts::{
    NO_RESULTS_SUMMARY, build_context, interpretation_system_prompt, summarization_prompt,
    summarization_system_prompt,
};

/// Answers natural-language queries from live web results.
///
/// Holds no per-request state, so one pipeline can serve any number of
/// independent [`run`](Self::run) calls.
///
/// # Examples
///
/// ```no_run
/// use askweb::{AgentConfig, Query, QueryPipeline};
///
/// # fn example() -> anyhow::Result<()> {
/// let config = AgentConfig::from_env()?;
/// let pipeline = QueryPipeline::from_config(&config)?;
///
/// let outcome = pipeline.run(&Query::new("latest rust release")?)?;
/// println!("{}", outcome.summary());
/// # Ok(())
/// # }
/// ```
pub struct QueryPipeline {
    llm: Arc<dyn OllamaClientTrait>,
    search: SearchOrchestrator,
    today: Option<Date>,
}

impl QueryPipeline {
    /// Creates a pipeline from a language model client and a search orchestrator.
    pub fn new(llm: Arc<dyn OllamaClientTrait>, search: SearchOrchestrator) -> Self {
        Self {
            llm,
            search,
            today: None,
        }
    }

    /// Creates a pipeline backed by the Ollama and SearXNG endpoints in `config`.
    pub fn from_config(config: &AgentConfig) -> anyhow::Result<Self> {
        let llm = OllamaClientBuilder::from_config(config).build()?;
        let searxng = SearxngClientBuilder::from_config(config).build()?;
        let search = SearchOrchestrator::with_engines(Arc::new(searxng), config.engines().iter().cloned());

        Ok(Self::new(Arc::new(llm), search))
    }

    /// Pins the date given to the interpretation prompt instead of using the clock.
    #[must_use]
    pub fn with_date(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    /// Runs the three stages in order.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InterpretationFailed`] if the model fails or returns
    ///   blank text for the search query. No search is attempted.
    /// - [`PipelineError::SummarizationFailed`] if the model fails while
    ///   summarizing non-empty results.
    ///
    /// Finding no results is not an error: the outcome then carries
    /// [`NO_RESULTS_SUMMARY`] and an empty result list.
    pub fn run(&self, query: &Query) -> Result<PipelineOutcome, PipelineError> {
        let search_query = self.interpret(query)?;
        info!(search_query = %search_query, "interpreted query");

        let results = self.search.search(search_query.as_str());

        let summary = self.summarize(query, &results)?;

        Ok(PipelineOutcome::new(summary, search_query, results))
    }

    fn interpret(&self, query: &Query) -> Result<InterpretedQuery, PipelineError> {
        let system = interpretation_system_prompt(self.today());

        let output = self
            .llm
            .generate(query.as_str(), Some(&system))
            .map_err(PipelineError::interpretation)?;

        InterpretedQuery::from_model_output(&output).ok_or_else(PipelineError::empty_interpretation)
    }

    fn summarize(&self, query: &Query, results: &[SearchResult]) -> Result<String, PipelineError> {
        if results.is_empty() {
            debug!("no results, skipping summarization");
            return Ok(NO_RESULTS_SUMMARY.to_string());
        }

        let context = build_context(results);
        let prompt = summarization_prompt(query, &context);

        self.llm
            .generate(&prompt, Some(summarization_system_prompt()))
            .map_err(PipelineError::summarization)
    }

    fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }
}
