//! Search results state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of the injected search API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    /// Facet buckets keyed by facet field.
    pub aggregations: Map<String, Value>,
    /// Hits of the requested page.
    pub hits: Vec<Value>,
    /// Total number of matching documents.
    pub total: u64,
}

impl SearchResponse {
    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// A failed search, as carried by an error action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFailure {
    /// Short machine-readable category (e.g. `unavailable`).
    pub kind: String,
    /// Human-readable description.
    pub message: String,
}

impl SearchFailure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

/// Results of the last search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsState {
    /// A search is in flight.
    pub loading: bool,
    /// Data of the last successful search.
    pub data: SearchResponse,
    /// Failure of the last search, cleared by the next success.
    pub error: Option<SearchFailure>,
}

impl ResultsState {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
