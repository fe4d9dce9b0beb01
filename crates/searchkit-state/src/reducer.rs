//! Pure state transitions.
//!
//! The reducers own the state they are given and return the next one. They
//! perform no I/O; URL writes and search requests are triggered by the action
//! creators in `searchkit-core`.

use tracing::trace;

use crate::action::Action;
use crate::aggregation::toggle_filter;
use crate::app::AppState;
use crate::query::QueryState;
use crate::results::{ResultsState, SearchResponse};
use crate::suggestions::SuggestionsState;

const FIRST_PAGE: u32 = 1;

/// Apply `action` to the full application state.
pub fn reduce(state: AppState, action: &Action) -> AppState {
    trace!(action = action.kind().as_str(), "reduce");
    let AppState {
        query,
        results,
        suggestions,
    } = state;
    AppState {
        query: reduce_query(query, action),
        results: reduce_results(results, action),
        suggestions: reduce_suggestions(suggestions, action),
    }
}

/// Query reducer.
///
/// Any change that alters the result set (text, sort, size, filters) sends
/// the user back to the first page.
pub fn reduce_query(mut state: QueryState, action: &Action) -> QueryState {
    match action {
        Action::SetQueryComponentInitialState(patch) => state.apply(patch),
        Action::SetStateFromUrl(from_url) => state.clone_from(from_url),
        Action::SetQueryString(query_string) => {
            state.query_string.clone_from(query_string);
            state.page = Some(FIRST_PAGE);
        }
        Action::SetQuerySortBy(sort_by) => {
            state.sort_by = Some(sort_by.clone());
            state.page = Some(FIRST_PAGE);
        }
        Action::SetQuerySortOrder(sort_order) => {
            state.sort_order = Some(*sort_order);
            state.page = Some(FIRST_PAGE);
        }
        Action::SetQuerySorting {
            sort_by,
            sort_order,
        } => {
            state.sort_by = Some(sort_by.clone());
            state.sort_order = Some(*sort_order);
            state.page = Some(FIRST_PAGE);
        }
        Action::SetQueryPaginationPage(page) => state.page = Some(*page),
        Action::SetQueryPaginationSize(size) => {
            state.size = Some(*size);
            state.page = Some(FIRST_PAGE);
        }
        Action::SetQueryAggregation(filter) => {
            toggle_filter(&mut state.aggregations, filter.clone());
            state.page = Some(FIRST_PAGE);
        }
        Action::SetResultsLayout(layout) => state.layout = Some(*layout),
        Action::ResetQuery => {
            state.query_string.clear();
            state.aggregations.clear();
            state.page = Some(FIRST_PAGE);
        }
        _ => {}
    }
    state
}

/// Results reducer.
pub fn reduce_results(mut state: ResultsState, action: &Action) -> ResultsState {
    match action {
        Action::ResultsLoading => state.loading = true,
        Action::ResultsFetchSuccess(response) => {
            state.loading = false;
            state.data = response.clone();
            state.error = None;
        }
        Action::ResultsFetchError(failure) => {
            state.loading = false;
            state.data = SearchResponse::default();
            state.error = Some(failure.clone());
        }
        _ => {}
    }
    state
}

/// Suggestions reducer.
pub fn reduce_suggestions(mut state: SuggestionsState, action: &Action) -> SuggestionsState {
    match action {
        Action::SetSuggestionString(text) => state.query.clone_from(text),
        Action::SuggestionLoading => state.loading = true,
        Action::SuggestionFetchSuccess(suggestions) => {
            state.loading = false;
            state.suggestions.clone_from(suggestions);
            state.error = None;
        }
        Action::SuggestionFetchError(failure) => {
            state.loading = false;
            state.suggestions.clear();
            state.error = Some(failure.clone());
        }
        Action::ClearSuggestions => state = SuggestionsState::default(),
        _ => {}
    }
    state
}
