//! Type-ahead suggestion state.

use serde::{Deserialize, Serialize};

use crate::results::SearchFailure;

/// Suggestions for the text currently being typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsState {
    /// Text the suggestions were requested for.
    pub query: String,
    pub loading: bool,
    pub suggestions: Vec<String>,
    pub error: Option<SearchFailure>,
}
