//! Round-trip properties of the URL codec.

use std::sync::Arc;

use proptest::prelude::*;

use searchkit_state::{AggregationFilter, Layout, QueryState, SortOrder};
use searchkit_url::{History, MemoryHistory, UrlQueryStringHandler};

fn filter_strategy() -> impl Strategy<Value = AggregationFilter> {
    (
        "[a-z+:\\\\]{1,6}",
        "[a-z0-9+:\\\\]{1,6}",
        proptest::option::of(("[a-z+:\\\\]{1,6}", "[a-z0-9+:\\\\]{1,6}")),
    )
        .prop_map(|(field, value, child)| {
            let filter = AggregationFilter::new(field, value);
            match child {
                Some((field, value)) => filter.with_child(AggregationFilter::new(field, value)),
                None => filter,
            }
        })
}

fn state_strategy() -> impl Strategy<Value = QueryState> {
    (
        "[a-zA-Z0-9 &=?%+:]{0,24}",
        proptest::option::of("[a-z_]{1,12}"),
        proptest::option::of(prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]),
        proptest::option::of(1u32..10_000),
        proptest::option::of(1u32..500),
        proptest::collection::vec(filter_strategy(), 0..4),
        proptest::option::of(prop_oneof![Just(Layout::List), Just(Layout::Grid)]),
    )
        .prop_map(
            |(query_string, sort_by, sort_order, page, size, filters, layout)| {
                let mut aggregations: Vec<AggregationFilter> = Vec::new();
                for filter in filters {
                    if !aggregations.contains(&filter) {
                        aggregations.push(filter);
                    }
                }
                QueryState {
                    query_string,
                    sort_by,
                    sort_order,
                    page,
                    size,
                    aggregations,
                    layout,
                }
            },
        )
}

proptest! {
    #[test]
    fn written_state_reads_back(state in state_strategy()) {
        let history = Arc::new(MemoryHistory::new("/search"));
        let handler = UrlQueryStringHandler::new(history.clone());

        let location = handler.set(&state);
        prop_assert_eq!(history.location(), location);

        let decoded = handler.get(&QueryState::default());
        prop_assert_eq!(decoded, state);
    }
}

#[test]
fn bootstrap_location_from_the_wild() {
    let history = Arc::new(MemoryHistory::new(
        "/test.html?q=this is my message&sort=bestmatch&order=asc&p=1&s=10&unknown=invalid",
    ));
    let handler = UrlQueryStringHandler::new(history);

    let state = handler.get(&QueryState::default());

    assert_eq!(state.query_string, "this is my message");
    assert_eq!(state.sort_by.as_deref(), Some("bestmatch"));
    assert_eq!(state.sort_order, Some(SortOrder::Asc));
    assert_eq!(state.page, Some(1));
    assert_eq!(state.size, Some(10));
    assert!(state.aggregations.is_empty());
    assert_eq!(state.layout, None);
}
