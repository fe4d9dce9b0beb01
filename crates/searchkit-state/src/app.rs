//! Root state held by the store.

use serde::{Deserialize, Serialize};

use crate::query::QueryState;
use crate::results::ResultsState;
use crate::suggestions::SuggestionsState;

/// Complete search UI state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub query: QueryState,
    pub results: ResultsState,
    pub suggestions: SuggestionsState,
}

impl AppState {
    /// Create a state whose query starts from `query`.
    pub fn with_query(query: QueryState) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }
}
