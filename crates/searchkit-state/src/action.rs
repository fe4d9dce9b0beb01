//! Actions: every event that may change the search state.
//!
//! Actions serialize as `{ "type": "SET_QUERY_STRING", "payload": ... }`, the
//! same shape a Redux-style host or devtools expects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationFilter;
use crate::query::{Layout, QueryState, QueryStatePatch, SortOrder};
use crate::results::{SearchFailure, SearchResponse};

/// Root action enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // =========================================================================
    // Query
    // =========================================================================
    /// Initial state declared by the host component
    SetQueryComponentInitialState(QueryStatePatch),

    /// Full query state decoded from the URL
    SetStateFromUrl(QueryState),

    /// New free-text query
    SetQueryString(String),

    /// New sort field
    SetQuerySortBy(String),

    /// New sort direction
    SetQuerySortOrder(SortOrder),

    /// Sort field and direction together
    #[serde(rename_all = "camelCase")]
    SetQuerySorting {
        sort_by: String,
        sort_order: SortOrder,
    },

    /// Jump to a page
    SetQueryPaginationPage(u32),

    /// Change results per page
    SetQueryPaginationSize(u32),

    /// Toggle a facet filter
    SetQueryAggregation(AggregationFilter),

    /// Change result layout
    SetResultsLayout(Layout),

    /// Clear text and filters
    ResetQuery,

    // =========================================================================
    // Results
    // =========================================================================
    ResultsLoading,
    ResultsFetchSuccess(SearchResponse),
    ResultsFetchError(SearchFailure),

    // =========================================================================
    // Suggestions
    // =========================================================================
    SetSuggestionString(String),
    SuggestionLoading,
    SuggestionFetchSuccess(Vec<String>),
    SuggestionFetchError(SearchFailure),
    ClearSuggestions,
}

impl Action {
    /// The payload-less type of this action.
    pub fn kind(&self) -> ActionType {
        match self {
            Self::SetQueryComponentInitialState(_) => ActionType::SetQueryComponentInitialState,
            Self::SetStateFromUrl(_) => ActionType::SetStateFromUrl,
            Self::SetQueryString(_) => ActionType::SetQueryString,
            Self::SetQuerySortBy(_) => ActionType::SetQuerySortBy,
            Self::SetQuerySortOrder(_) => ActionType::SetQuerySortOrder,
            Self::SetQuerySorting { .. } => ActionType::SetQuerySorting,
            Self::SetQueryPaginationPage(_) => ActionType::SetQueryPaginationPage,
            Self::SetQueryPaginationSize(_) => ActionType::SetQueryPaginationSize,
            Self::SetQueryAggregation(_) => ActionType::SetQueryAggregation,
            Self::SetResultsLayout(_) => ActionType::SetResultsLayout,
            Self::ResetQuery => ActionType::ResetQuery,
            Self::ResultsLoading => ActionType::ResultsLoading,
            Self::ResultsFetchSuccess(_) => ActionType::ResultsFetchSuccess,
            Self::ResultsFetchError(_) => ActionType::ResultsFetchError,
            Self::SetSuggestionString(_) => ActionType::SetSuggestionString,
            Self::SuggestionLoading => ActionType::SuggestionLoading,
            Self::SuggestionFetchSuccess(_) => ActionType::SuggestionFetchSuccess,
            Self::SuggestionFetchError(_) => ActionType::SuggestionFetchError,
            Self::ClearSuggestions => ActionType::ClearSuggestions,
        }
    }

    /// Returns `true` for actions that change the query state.
    pub fn is_query_change(&self) -> bool {
        self.kind().is_query_change()
    }
}

/// Discriminant of [`Action`], with its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    SetQueryComponentInitialState,
    SetStateFromUrl,
    SetQueryString,
    SetQuerySortBy,
    SetQuerySortOrder,
    SetQuerySorting,
    SetQueryPaginationPage,
    SetQueryPaginationSize,
    SetQueryAggregation,
    SetResultsLayout,
    ResetQuery,
    ResultsLoading,
    ResultsFetchSuccess,
    ResultsFetchError,
    SetSuggestionString,
    SuggestionLoading,
    SuggestionFetchSuccess,
    SuggestionFetchError,
    ClearSuggestions,
}

impl ActionType {
    /// Wire name of the action type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetQueryComponentInitialState => "SET_QUERY_COMPONENT_INITIAL_STATE",
            Self::SetStateFromUrl => "SET_STATE_FROM_URL",
            Self::SetQueryString => "SET_QUERY_STRING",
            Self::SetQuerySortBy => "SET_QUERY_SORT_BY",
            Self::SetQuerySortOrder => "SET_QUERY_SORT_ORDER",
            Self::SetQuerySorting => "SET_QUERY_SORTING",
            Self::SetQueryPaginationPage => "SET_QUERY_PAGINATION_PAGE",
            Self::SetQueryPaginationSize => "SET_QUERY_PAGINATION_SIZE",
            Self::SetQueryAggregation => "SET_QUERY_AGGREGATION",
            Self::SetResultsLayout => "SET_RESULTS_LAYOUT",
            Self::ResetQuery => "RESET_QUERY",
            Self::ResultsLoading => "RESULTS_LOADING",
            Self::ResultsFetchSuccess => "RESULTS_FETCH_SUCCESS",
            Self::ResultsFetchError => "RESULTS_FETCH_ERROR",
            Self::SetSuggestionString => "SET_SUGGESTION_STRING",
            Self::SuggestionLoading => "SUGGESTION_LOADING",
            Self::SuggestionFetchSuccess => "SUGGESTION_FETCH_SUCCESS",
            Self::SuggestionFetchError => "SUGGESTION_FETCH_ERROR",
            Self::ClearSuggestions => "CLEAR_SUGGESTIONS",
        }
    }

    /// Returns `true` for action types handled by the query reducer.
    pub fn is_query_change(&self) -> bool {
        matches!(
            self,
            Self::SetQueryComponentInitialState
                | Self::SetStateFromUrl
                | Self::SetQueryString
                | Self::SetQuerySortBy
                | Self::SetQuerySortOrder
                | Self::SetQuerySorting
                | Self::SetQueryPaginationPage
                | Self::SetQueryPaginationSize
                | Self::SetQueryAggregation
                | Self::SetResultsLayout
                | Self::ResetQuery
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
