use serde_json::json;

use searchkit_state::{
    Action, AggregationFilter, AppState, Layout, QueryState, QueryStatePatch, SearchFailure,
    SearchResponse, SortOrder, SuggestionsState, reduce,
};

fn dispatch_all(actions: Vec<Action>) -> AppState {
    actions
        .iter()
        .fold(AppState::default(), |state, action| reduce(state, action))
}

fn sample_response() -> SearchResponse {
    SearchResponse {
        aggregations: json!({"type": {"buckets": []}})
            .as_object()
            .cloned()
            .unwrap(),
        hits: vec![json!({"id": 1, "title": "Higgs"})],
        total: 1,
    }
}

#[test]
fn initial_state_patch_is_merged() {
    let state = dispatch_all(vec![Action::SetQueryComponentInitialState(
        QueryStatePatch::new()
            .query_string("this is my message")
            .size(10),
    )]);

    assert_eq!(state.query.query_string, "this is my message");
    assert_eq!(state.query.size, Some(10));
    assert_eq!(state.query.page, None);
}

#[test]
fn state_from_url_replaces_query() {
    let from_url = QueryState {
        query_string: "higgs".to_string(),
        sort_by: Some("bestmatch".to_string()),
        sort_order: Some(SortOrder::Asc),
        page: Some(2),
        size: Some(10),
        ..QueryState::default()
    };
    let state = dispatch_all(vec![
        Action::SetQueryString("old".to_string()),
        Action::SetStateFromUrl(from_url.clone()),
    ]);

    assert_eq!(state.query, from_url);
}

#[test]
fn field_updates_reset_to_first_page() {
    let state = dispatch_all(vec![
        Action::SetQueryPaginationPage(5),
        Action::SetQuerySortBy("mostrecent".to_string()),
    ]);
    assert_eq!(state.query.sort_by.as_deref(), Some("mostrecent"));
    assert_eq!(state.query.page, Some(1));

    let state = dispatch_all(vec![
        Action::SetQueryPaginationPage(5),
        Action::SetQuerySortOrder(SortOrder::Desc),
    ]);
    assert_eq!(state.query.sort_order, Some(SortOrder::Desc));
    assert_eq!(state.query.page, Some(1));

    let state = dispatch_all(vec![
        Action::SetQueryPaginationPage(5),
        Action::SetQueryPaginationSize(50),
    ]);
    assert_eq!(state.query.size, Some(50));
    assert_eq!(state.query.page, Some(1));
}

#[test]
fn page_and_layout_do_not_touch_other_fields() {
    let state = dispatch_all(vec![
        Action::SetQueryString("higgs".to_string()),
        Action::SetQueryPaginationPage(3),
        Action::SetResultsLayout(Layout::Grid),
    ]);

    assert_eq!(state.query.query_string, "higgs");
    assert_eq!(state.query.page, Some(3));
    assert_eq!(state.query.layout, Some(Layout::Grid));
}

#[test]
fn aggregation_action_toggles_filter() {
    let filter = AggregationFilter::new("type", "publication");
    let state = dispatch_all(vec![Action::SetQueryAggregation(filter.clone())]);
    assert_eq!(state.query.aggregations, vec![filter.clone()]);

    let state = reduce(state, &Action::SetQueryAggregation(filter));
    assert!(state.query.aggregations.is_empty());
}

#[test]
fn reset_keeps_sort_size_and_layout() {
    let state = dispatch_all(vec![
        Action::SetQuerySorting {
            sort_by: "mostrecent".to_string(),
            sort_order: SortOrder::Desc,
        },
        Action::SetQueryPaginationSize(20),
        Action::SetResultsLayout(Layout::List),
        Action::SetQueryString("higgs".to_string()),
        Action::SetQueryAggregation(AggregationFilter::new("type", "dataset")),
        Action::SetQueryPaginationPage(4),
        Action::ResetQuery,
    ]);

    assert_eq!(state.query.query_string, "");
    assert!(state.query.aggregations.is_empty());
    assert_eq!(state.query.page, Some(1));
    assert_eq!(state.query.sort_by.as_deref(), Some("mostrecent"));
    assert_eq!(state.query.size, Some(20));
    assert_eq!(state.query.layout, Some(Layout::List));
}

#[test]
fn results_follow_loading_then_success() {
    let loading = dispatch_all(vec![Action::ResultsLoading]);
    assert!(loading.results.loading);

    let done = reduce(loading, &Action::ResultsFetchSuccess(sample_response()));
    assert!(!done.results.loading);
    assert_eq!(done.results.data, sample_response());
    assert!(!done.results.has_error());
}

#[test]
fn fetch_error_clears_data() {
    let state = dispatch_all(vec![
        Action::ResultsLoading,
        Action::ResultsFetchSuccess(sample_response()),
        Action::ResultsLoading,
        Action::ResultsFetchError(SearchFailure::new("unavailable", "backend down")),
    ]);

    assert!(!state.results.loading);
    assert!(state.results.data.hits.is_empty());
    assert_eq!(
        state.results.error.as_ref().map(|e| e.kind.as_str()),
        Some("unavailable")
    );

    let recovered = reduce(state, &Action::ResultsFetchSuccess(sample_response()));
    assert!(recovered.results.error.is_none());
}

#[test]
fn suggestions_lifecycle() {
    let state = dispatch_all(vec![
        Action::SetSuggestionString("hig".to_string()),
        Action::SuggestionLoading,
        Action::SuggestionFetchSuccess(vec!["higgs".to_string()]),
    ]);
    assert_eq!(state.suggestions.query, "hig");
    assert!(!state.suggestions.loading);
    assert_eq!(state.suggestions.suggestions, vec!["higgs".to_string()]);

    let cleared = reduce(state, &Action::ClearSuggestions);
    assert_eq!(cleared.suggestions, SuggestionsState::default());
}

#[test]
fn result_actions_leave_query_untouched() {
    let before = dispatch_all(vec![Action::SetQueryString("higgs".to_string())]);
    let after = reduce(before.clone(), &Action::ResultsLoading);
    assert_eq!(before.query, after.query);
}
