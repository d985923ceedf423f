//! Prompt text for the interpretation and summarization calls.

use time::Date;
use time::macros::format_description;

use crate::models::{MAX_RESULTS, Query, SearchResult};

/// Summary used when no engine returned anything. The model is not called.
pub const NO_RESULTS_SUMMARY: &str = "No search results found.";

const SUMMARIZATION_SYSTEM_PROMPT: &str = "You are a helpful assistant. You MUST answer the user's query using ONLY the provided search results below. \
Do not use your pre-trained knowledge to answer the question if the information is available in the search results. \
If the search results contain the answer, summarize them clearly. \
If the search results do not contain the answer, state that you could not find the information in the search results. \
Include the source (URL) for your answer.";

/// System instruction for rewriting a user query into a search query.
///
/// Embeds `today` so that "recent" or "latest" resolve against the real date.
pub fn interpretation_system_prompt(today: Date) -> String {
    let date = today
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| today.to_string());

    format!(
        "You are a helpful assistant. Today's date is {date}. \
Your goal is to interpret the user's query and formulate a concise search query for a search engine. \
If the user asks for 'recent' or 'latest' information, use the current year/month from today's date. \
Output ONLY the search query, nothing else."
    )
}

/// System instruction that restricts the answer to the given results.
pub fn summarization_system_prompt() -> &'static str {
    SUMMARIZATION_SYSTEM_PROMPT
}

/// Renders the first [`MAX_RESULTS`] results as numbered grounding context.
///
/// Missing fields are rendered with their placeholders.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(i, result)| {
            format!(
                "Result {}:\nTitle: {}\nSnippet: {}\nURL: {}\n\n",
                i + 1,
                result.title_or_placeholder(),
                result.content_or_placeholder(),
                result.url_or_placeholder()
            )
        })
        .collect()
}

/// The user-facing prompt for the summarization call.
pub(crate) fn summarization_prompt(query: &Query, context: &str) -> String {
    format!(
        "User Query: {}\n\nSearch Results:\n{}\n\nPlease provide a summary answer:",
        query, context
    )
}
