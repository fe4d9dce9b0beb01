//! SearchKit state layer.
//!
//! This crate holds the data model of a search UI and the pure functions that
//! evolve it. The architecture follows the Elm/Redux split:
//!
//! - **QueryState**: what the user is searching for (text, sort, page, facets)
//! - **ResultsState**: what the search backend returned
//! - **SuggestionsState**: type-ahead completions
//! - **Action**: every event that may change the state
//! - **reduce**: `(AppState, Action) -> AppState`, the only place state changes
//!
//! Side effects (URL writes, search requests) live in `searchkit-core`.

#![deny(unsafe_code)]

pub mod action;
pub mod aggregation;
pub mod app;
pub mod error;
pub mod query;
pub mod reducer;
pub mod results;
pub mod suggestions;

pub use action::{Action, ActionType};
pub use aggregation::{AggregationFilter, toggle_filter};
pub use app::AppState;
pub use error::StateError;
pub use query::{Layout, QueryState, QueryStatePatch, SortOrder};
pub use reducer::{reduce, reduce_query, reduce_results, reduce_suggestions};
pub use results::{ResultsState, SearchFailure, SearchResponse};
pub use suggestions::SuggestionsState;
