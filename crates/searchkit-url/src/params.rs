//! URL parameter names and value validation.

use serde::{Deserialize, Serialize};

use searchkit_state::{AggregationFilter, Layout, SortOrder};

/// Query state field that has a URL representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    QueryString,
    SortBy,
    SortOrder,
    Page,
    Size,
    Layout,
    Aggregations,
}

impl QueryField {
    /// All fields, in the order they are written to the URL.
    pub const ALL: [QueryField; 7] = [
        Self::QueryString,
        Self::SortBy,
        Self::SortOrder,
        Self::Page,
        Self::Size,
        Self::Layout,
        Self::Aggregations,
    ];

    /// Fields that may appear more than once in a query string.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Self::Aggregations)
    }
}

/// Parameter name used for each query field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlParamsMapping {
    pub query_string: String,
    pub sort_by: String,
    pub sort_order: String,
    pub page: String,
    pub size: String,
    pub layout: String,
    pub aggregations: String,
}

impl Default for UrlParamsMapping {
    fn default() -> Self {
        Self {
            query_string: "q".to_string(),
            sort_by: "sort".to_string(),
            sort_order: "order".to_string(),
            page: "p".to_string(),
            size: "s".to_string(),
            layout: "l".to_string(),
            aggregations: "f".to_string(),
        }
    }
}

impl UrlParamsMapping {
    /// Parameter name for `field`.
    pub fn key_for(&self, field: QueryField) -> &str {
        match field {
            QueryField::QueryString => &self.query_string,
            QueryField::SortBy => &self.sort_by,
            QueryField::SortOrder => &self.sort_order,
            QueryField::Page => &self.page,
            QueryField::Size => &self.size,
            QueryField::Layout => &self.layout,
            QueryField::Aggregations => &self.aggregations,
        }
    }

    /// Field mapped to parameter `key`, if any.
    pub fn field_for(&self, key: &str) -> Option<QueryField> {
        QueryField::ALL
            .into_iter()
            .find(|field| self.key_for(*field) == key)
    }
}

/// Decides whether a raw URL value is acceptable for a field.
///
/// Rejected values are dropped; the field then keeps its current value.
pub trait UrlParamValidator: Send + Sync {
    fn is_valid(&self, field: QueryField, value: &str) -> bool;
}

/// Accepts exactly the values the query state can represent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl UrlParamValidator for DefaultValidator {
    fn is_valid(&self, field: QueryField, value: &str) -> bool {
        match field {
            QueryField::QueryString => true,
            QueryField::SortBy => !value.trim().is_empty(),
            QueryField::SortOrder => value.parse::<SortOrder>().is_ok(),
            QueryField::Page | QueryField::Size => value.parse::<u32>().is_ok_and(|n| n > 0),
            QueryField::Layout => value.parse::<Layout>().is_ok(),
            QueryField::Aggregations => value.parse::<AggregationFilter>().is_ok(),
        }
    }
}
