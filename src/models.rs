mod outcome;
mod query;
mod search_result;

pub use outcome::{MAX_RESULTS, PipelineOutcome};
pub use query::{InterpretedQuery, Query, QueryError};
pub use search_result::{NO_CONTENT, NO_TITLE, NO_URL, SearchResult};
