//! Injected search backends.
//!
//! The transport behind these traits (HTTP, embedded index, ...) is the
//! host's business; the kit only awaits the result.

mod memory;

use async_trait::async_trait;

use searchkit_state::{QueryState, SearchResponse};

use crate::error::SearchApiError;

pub use memory::InMemorySearchApi;

/// Runs a search for a query state.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &QueryState) -> Result<SearchResponse, SearchApiError>;
}

/// Returns completions for partially typed text.
#[async_trait]
pub trait SuggestionApi: Send + Sync {
    async fn suggest(&self, text: &str) -> Result<Vec<String>, SearchApiError>;
}
