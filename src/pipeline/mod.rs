//! Query answering over live web results.
//!
//! `QueryPipeline` rewrites a user query into a search query with the
//! language model, runs it through the engine fallback chain, and asks the
//! model for a summary grounded in the top results.

mod error;
mod prompts;
mod query_pipeline;

pub use error::PipelineError;
pub use prompts::{NO_RESULTS_SUMMARY, build_context, interpretation_system_prompt};
pub use query_pipeline::QueryPipeline;
