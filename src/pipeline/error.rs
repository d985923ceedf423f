use thiserror::Error;

use crate::ollama::OllamaError;

/// Reasons a pipeline run ends without an outcome.
///
/// Search failures never appear here; they degrade into empty results.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The language model could not produce a search query.
    ///
    /// `source` is `None` when the model answered with blank text.
    #[error("Failed to interpret query: {reason}")]
    InterpretationFailed {
        reason: String,
        #[source]
        source: Option<OllamaError>,
    },

    /// The language model could not summarize the search results.
    #[error("Failed to summarize search results: {source}")]
    SummarizationFailed {
        #[source]
        source: OllamaError,
    },
}

impl PipelineError {
    pub(crate) fn interpretation(source: OllamaError) -> Self {
        Self::InterpretationFailed {
            reason: source.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn empty_interpretation() -> Self {
        Self::InterpretationFailed {
            reason: "language model returned an empty search query".to_string(),
            source: None,
        }
    }

    pub(crate) fn summarization(source: OllamaError) -> Self {
        Self::SummarizationFailed { source }
    }
}
