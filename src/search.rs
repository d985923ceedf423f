//! Web search through a SearXNG instance.
//!
//! `SearxngClient` talks to one engine per request; `SearchOrchestrator`
//! walks an ordered engine list and stops at the first engine that returns
//! anything.

mod orchestrator;
mod provider;

pub use orchestrator::SearchOrchestrator;
pub use provider::{SearchError, SearchProvider, SearxngClient, SearxngClientBuilder};
