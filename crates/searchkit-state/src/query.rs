//! Query state: the parameters of the current search.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationFilter;
use crate::error::StateError;

// =============================================================================
// SORT ORDER
// =============================================================================

/// Direction applied to the sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// All sort orders.
    pub const ALL: [SortOrder; 2] = [Self::Asc, Self::Desc];

    /// Wire form used in URLs and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(StateError::InvalidSortOrder(other.to_string())),
        }
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// How the host renders the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One result per row
    List,
    /// Results as cards in a grid
    Grid,
}

impl Layout {
    /// All layouts.
    pub const ALL: [Layout; 2] = [Self::List, Self::Grid];

    /// Wire form used in URLs and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "grid" => Ok(Self::Grid),
            other => Err(StateError::InvalidLayout(other.to_string())),
        }
    }
}

// =============================================================================
// QUERY STATE
// =============================================================================

/// Parameters of the current search.
///
/// Every field defaults to empty or `None`. The state is created once when
/// the application starts (from the URL or an initial-state payload) and is
/// then changed one field at a time by dispatched actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryState {
    /// Free-text query.
    pub query_string: String,
    /// Field the backend sorts on.
    pub sort_by: Option<String>,
    /// Direction of the sort.
    pub sort_order: Option<SortOrder>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Results per page.
    pub size: Option<u32>,
    /// Selected facet filters, in selection order.
    pub aggregations: Vec<AggregationFilter>,
    /// Result layout.
    pub layout: Option<Layout>,
}

impl QueryState {
    /// Create an empty query state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the fields carried by `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &QueryStatePatch) {
        if let Some(query_string) = &patch.query_string {
            self.query_string.clone_from(query_string);
        }
        if let Some(sort_by) = &patch.sort_by {
            self.sort_by = Some(sort_by.clone());
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = Some(sort_order);
        }
        if let Some(page) = patch.page {
            self.page = Some(page);
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
        if let Some(aggregations) = &patch.aggregations {
            self.aggregations.clone_from(aggregations);
        }
        if let Some(layout) = patch.layout {
            self.layout = Some(layout);
        }
    }

    /// Returns `true` if `filter` is currently selected.
    pub fn has_filter(&self, filter: &AggregationFilter) -> bool {
        self.aggregations.contains(filter)
    }
}

/// Partial query state used as an initial-state payload.
///
/// Keys accept both the camelCase form of the state tree and snake_case, so
/// the same patch can be written in JSON payloads and TOML config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryStatePatch {
    #[serde(alias = "query_string", skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    #[serde(alias = "sort_by", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(alias = "sort_order", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Vec<AggregationFilter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl QueryStatePatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = Some(query_string.into());
        self
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    #[must_use]
    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn aggregations(mut self, aggregations: Vec<AggregationFilter>) -> Self {
        self.aggregations = Some(aggregations);
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Returns `true` if the patch carries no field.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_parses_only_lowercase_wire_values() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("DESC".parse::<SortOrder>().is_err());
        assert!("".parse::<SortOrder>().is_err());
    }

    #[test]
    fn layout_display_matches_parse() {
        for layout in Layout::ALL {
            assert_eq!(layout.to_string().parse::<Layout>(), Ok(layout));
        }
    }

    #[test]
    fn patch_overwrites_only_carried_fields() {
        let mut state = QueryState {
            query_string: "old".to_string(),
            sort_by: Some("bestmatch".to_string()),
            size: Some(20),
            ..QueryState::default()
        };

        state.apply(&QueryStatePatch::new().query_string("new").page(3));

        assert_eq!(state.query_string, "new");
        assert_eq!(state.page, Some(3));
        assert_eq!(state.sort_by.as_deref(), Some("bestmatch"));
        assert_eq!(state.size, Some(20));
    }

    #[test]
    fn state_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(QueryState::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "queryString": "",
                "sortBy": null,
                "sortOrder": null,
                "page": null,
                "size": null,
                "aggregations": [],
                "layout": null,
            })
        );
    }

    #[test]
    fn patch_accepts_snake_case_aliases() {
        let patch: QueryStatePatch =
            serde_json::from_str(r#"{"sort_by": "mostrecent", "sortOrder": "desc"}"#).unwrap();
        assert_eq!(patch.sort_by.as_deref(), Some("mostrecent"));
        assert_eq!(patch.sort_order, Some(SortOrder::Desc));
        assert!(!patch.is_empty());
        assert!(QueryStatePatch::new().is_empty());
    }
}
