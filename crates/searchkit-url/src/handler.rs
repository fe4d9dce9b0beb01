//! Query state <-> URL query string.

use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use url::form_urlencoded;
use url::{Position, Url};

use searchkit_state::{AggregationFilter, QueryState};

use crate::error::UrlError;
use crate::history::History;
use crate::params::{DefaultValidator, QueryField, UrlParamValidator, UrlParamsMapping};

/// Base used to resolve path-relative locations.
const LOCATION_BASE: &str = "http://localhost/";

/// Handler behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlHandlerConfig {
    /// Push a new history entry for every change (`true`) or overwrite the
    /// current one (`false`).
    pub keep_history: bool,
    /// Parameter names.
    pub params: UrlParamsMapping,
}

impl Default for UrlHandlerConfig {
    fn default() -> Self {
        Self {
            keep_history: true,
            params: UrlParamsMapping::default(),
        }
    }
}

/// Reads and writes the query state through the location's query string.
pub struct UrlQueryStringHandler {
    history: Arc<dyn History>,
    config: UrlHandlerConfig,
    validator: Arc<dyn UrlParamValidator>,
}

impl UrlQueryStringHandler {
    /// Create a handler with the default parameter names.
    pub fn new(history: Arc<dyn History>) -> Self {
        Self::with_config(history, UrlHandlerConfig::default())
    }

    pub fn with_config(history: Arc<dyn History>, config: UrlHandlerConfig) -> Self {
        Self {
            history,
            config,
            validator: Arc::new(DefaultValidator),
        }
    }

    /// Replace the value validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl UrlParamValidator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    pub fn config(&self) -> &UrlHandlerConfig {
        &self.config
    }

    /// Query state described by the current location, merged over `current`.
    ///
    /// Fields without a valid URL value keep their value from `current`. An
    /// unreadable location leaves `current` unchanged.
    pub fn get(&self, current: &QueryState) -> QueryState {
        let location = self.history.location();
        match self.decode(&location, current) {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable location");
                current.clone()
            }
        }
    }

    /// Decode `location` over `current`.
    ///
    /// For scalar fields the first valid occurrence wins. Repeated filter
    /// parameters accumulate; when at least one is present they replace the
    /// selected filters of `current`.
    pub fn decode(&self, location: &str, current: &QueryState) -> Result<QueryState, UrlError> {
        let url = parse_location(location)?;
        let mut state = current.clone();
        let mut seen = HashSet::new();
        let mut filters: Vec<AggregationFilter> = Vec::new();

        for (key, value) in url.query_pairs() {
            let Some(field) = self.config.params.field_for(&key) else {
                trace!(param = %key, "ignoring unknown url parameter");
                continue;
            };
            if !self.validator.is_valid(field, &value) {
                warn!(param = %key, value = %value, "dropping invalid url parameter");
                continue;
            }
            if !field.is_repeatable() && seen.contains(&field) {
                trace!(param = %key, "ignoring repeated url parameter");
                continue;
            }

            let applied = match field {
                QueryField::QueryString => {
                    state.query_string = value.into_owned();
                    true
                }
                QueryField::SortBy => {
                    state.sort_by = Some(value.into_owned());
                    true
                }
                QueryField::SortOrder => assign(&mut state.sort_order, parse_value(&key, &value)),
                QueryField::Page => assign(&mut state.page, parse_value(&key, &value)),
                QueryField::Size => assign(&mut state.size, parse_value(&key, &value)),
                QueryField::Layout => assign(&mut state.layout, parse_value(&key, &value)),
                QueryField::Aggregations => {
                    if let Some(filter) = parse_value::<AggregationFilter>(&key, &value)
                        && !filters.contains(&filter)
                    {
                        filters.push(filter);
                    }
                    true
                }
            };
            // A value that failed to parse leaves the field open for a later occurrence.
            if applied {
                seen.insert(field);
            }
        }

        if !filters.is_empty() {
            state.aggregations = filters;
        }
        Ok(state)
    }

    /// Query string (without `?`) for `state`.
    ///
    /// Only non-empty fields are written, in a fixed order: text, sort field,
    /// sort order, page, size, layout, then one parameter per filter.
    pub fn encode(&self, state: &QueryState) -> String {
        let params = &self.config.params;
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if !state.query_string.is_empty() {
            serializer.append_pair(&params.query_string, &state.query_string);
        }
        if let Some(sort_by) = &state.sort_by {
            serializer.append_pair(&params.sort_by, sort_by);
        }
        if let Some(sort_order) = state.sort_order {
            serializer.append_pair(&params.sort_order, sort_order.as_str());
        }
        if let Some(page) = state.page {
            serializer.append_pair(&params.page, &page.to_string());
        }
        if let Some(size) = state.size {
            serializer.append_pair(&params.size, &size.to_string());
        }
        if let Some(layout) = state.layout {
            serializer.append_pair(&params.layout, layout.as_str());
        }
        for filter in &state.aggregations {
            serializer.append_pair(&params.aggregations, &filter.to_string());
        }

        serializer.finish()
    }

    /// Write `state` to the location and return the new location.
    ///
    /// Only the query string of the current location is replaced; an absolute
    /// location stays absolute. Nothing is written when the location would
    /// not change.
    pub fn set(&self, state: &QueryState) -> String {
        let current = self.history.location();
        let query = self.encode(state);
        let query = (!query.is_empty()).then_some(query.as_str());

        let (location, unchanged) = match parse_location(&current) {
            Ok(current_url) => {
                let mut next = current_url.clone();
                next.set_query(query);
                let location = if Url::parse(&current).is_ok() {
                    next.to_string()
                } else {
                    next[Position::BeforePath..].to_string()
                };
                (location, next == current_url)
            }
            Err(err) => {
                warn!(error = %err, "current location unreadable, writing to '/'");
                let location = query.map_or_else(|| "/".to_string(), |query| format!("/?{query}"));
                (location, false)
            }
        };

        if unchanged {
            trace!(%location, "location unchanged");
        } else if self.config.keep_history {
            debug!(%location, "pushing location");
            self.history.push(&location);
        } else {
            debug!(%location, "replacing location");
            self.history.replace(&location);
        }
        location
    }
}

impl std::fmt::Debug for UrlQueryStringHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlQueryStringHandler")
            .field("location", &self.history.location())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn parse_location(location: &str) -> Result<Url, UrlError> {
    let invalid = |source| UrlError::InvalidLocation {
        location: location.to_string(),
        source,
    };
    let base = Url::parse(LOCATION_BASE).map_err(invalid)?;
    base.join(location).map_err(invalid)
}

/// Store `parsed` in `slot`; returns whether there was a value.
fn assign<T>(slot: &mut Option<T>, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

/// Parse a value the validator accepted; a custom validator may be looser
/// than the state types, so failures are logged and skipped.
fn parse_value<T>(key: &str, value: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(param = %key, value = %value, error = %err, "dropping unparsable url parameter");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use searchkit_state::{Layout, SortOrder};

    use super::*;
    use crate::history::MemoryHistory;

    fn handler_at(location: &str) -> (Arc<MemoryHistory>, UrlQueryStringHandler) {
        let history = Arc::new(MemoryHistory::new(location));
        let handler = UrlQueryStringHandler::new(history.clone());
        (history, handler)
    }

    #[test]
    fn reads_known_params_and_ignores_unknown() {
        let (_, handler) = handler_at(
            "/test.html?q=this is my message&sort=bestmatch&order=asc&p=1&s=10&unknown=invalid",
        );

        let state = handler.get(&QueryState::default());

        assert_eq!(
            state,
            QueryState {
                query_string: "this is my message".to_string(),
                sort_by: Some("bestmatch".to_string()),
                sort_order: Some(SortOrder::Asc),
                page: Some(1),
                size: Some(10),
                ..QueryState::default()
            }
        );
    }

    #[test]
    fn absent_params_keep_current_values() {
        let (_, handler) = handler_at("/search?q=higgs");
        let current = QueryState {
            size: Some(25),
            layout: Some(Layout::Grid),
            ..QueryState::default()
        };

        let state = handler.get(&current);

        assert_eq!(state.query_string, "higgs");
        assert_eq!(state.size, Some(25));
        assert_eq!(state.layout, Some(Layout::Grid));
    }

    #[test]
    fn invalid_values_are_dropped() {
        let (_, handler) = handler_at("/search?p=zero&s=0&order=up&l=table&f=broken");
        let state = handler.get(&QueryState::default());
        assert_eq!(state, QueryState::default());
    }

    #[test]
    fn first_scalar_wins_and_filters_accumulate() {
        let (_, handler) =
            handler_at("/search?q=first&q=second&f=type:a&f=type:b%2Bsub:c&f=type:a");
        let state = handler.get(&QueryState::default());

        assert_eq!(state.query_string, "first");
        assert_eq!(
            state.aggregations,
            vec![
                AggregationFilter::new("type", "a"),
                AggregationFilter::new("type", "b").with_child(AggregationFilter::new("sub", "c")),
            ]
        );
    }

    #[test]
    fn unparsable_first_value_does_not_shadow_later_ones() {
        struct AcceptAll;

        impl UrlParamValidator for AcceptAll {
            fn is_valid(&self, _field: QueryField, _value: &str) -> bool {
                true
            }
        }

        let history = Arc::new(MemoryHistory::new("/search?p=abc&p=3&order=up&order=desc"));
        let handler = UrlQueryStringHandler::new(history).with_validator(AcceptAll);

        let state = handler.get(&QueryState::default());

        assert_eq!(state.page, Some(3));
        assert_eq!(state.sort_order, Some(SortOrder::Desc));
    }

    #[test]
    fn escaped_filter_values_survive_the_url() {
        let (_, handler) = handler_at("/");
        let state = QueryState {
            aggregations: vec![AggregationFilter::new("lang", "C++")],
            ..QueryState::default()
        };

        let location = handler.set(&state);
        let decoded = handler.get(&QueryState::default());

        assert_eq!(location, "/?f=lang%3AC%5C%2B%5C%2B");
        assert_eq!(decoded.aggregations, state.aggregations);
    }

    #[test]
    fn encode_writes_only_present_fields_in_order() {
        let (_, handler) = handler_at("/");
        let state = QueryState {
            query_string: "dark matter".to_string(),
            sort_order: Some(SortOrder::Desc),
            page: Some(2),
            aggregations: vec![AggregationFilter::new("type", "dataset")],
            ..QueryState::default()
        };

        assert_eq!(
            handler.encode(&state),
            "q=dark+matter&order=desc&p=2&f=type%3Adataset"
        );
        assert_eq!(handler.encode(&QueryState::default()), "");
    }

    #[test]
    fn set_keeps_path_and_pushes_entry() {
        let (history, handler) = handler_at("/search?legacy=1");
        let state = QueryState {
            query_string: "higgs".to_string(),
            ..QueryState::default()
        };

        let location = handler.set(&state);

        assert_eq!(location, "/search?q=higgs");
        assert_eq!(history.entries(), vec!["/search?legacy=1", "/search?q=higgs"]);
    }

    #[test]
    fn set_skips_unchanged_location() {
        let (history, handler) = handler_at("/search?q=higgs");
        let state = QueryState {
            query_string: "higgs".to_string(),
            ..QueryState::default()
        };

        handler.set(&state);

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn set_keeps_absolute_locations_absolute() {
        let (history, handler) = handler_at("https://example.org/records?legacy=1#top");
        let state = QueryState {
            query_string: "cern".to_string(),
            ..QueryState::default()
        };

        let location = handler.set(&state);

        assert_eq!(location, "https://example.org/records?q=cern#top");
        assert_eq!(history.location(), location);
    }

    #[test]
    fn set_compares_locations_after_normalizing() {
        let (history, handler) = handler_at("/my records?q=higgs");
        let state = QueryState {
            query_string: "higgs".to_string(),
            ..QueryState::default()
        };

        handler.set(&state);

        assert_eq!(history.len(), 1);
        assert_eq!(history.location(), "/my records?q=higgs");
    }

    #[test]
    fn set_clears_query_when_state_is_empty() {
        let (history, handler) = handler_at("/search?q=higgs");

        let location = handler.set(&QueryState::default());

        assert_eq!(location, "/search");
        assert_eq!(history.entries(), vec!["/search?q=higgs", "/search"]);
    }

    #[test]
    fn set_replaces_when_history_is_not_kept() {
        let history = Arc::new(MemoryHistory::new("/search"));
        let handler = UrlQueryStringHandler::with_config(
            history.clone(),
            UrlHandlerConfig {
                keep_history: false,
                ..UrlHandlerConfig::default()
            },
        );

        handler.set(&QueryState {
            page: Some(3),
            ..QueryState::default()
        });

        assert_eq!(history.entries(), vec!["/search?p=3"]);
    }

    #[test]
    fn custom_param_names_are_honored() {
        let history = Arc::new(MemoryHistory::new("/search?text=higgs&q=ignored"));
        let mut config = UrlHandlerConfig::default();
        config.params.query_string = "text".to_string();
        let handler = UrlQueryStringHandler::with_config(history, config);

        let state = handler.get(&QueryState::default());

        assert_eq!(state.query_string, "higgs");
        assert_eq!(handler.encode(&state), "text=higgs");
    }

    #[test]
    fn absolute_locations_are_accepted() {
        let (_, handler) = handler_at("https://example.org/records?q=cern&s=20");
        let state = handler.get(&QueryState::default());
        assert_eq!(state.query_string, "cern");
        assert_eq!(state.size, Some(20));
    }
}
