//! Search backend over an in-memory document list.
//!
//! Documents are JSON objects. Matching, faceting and sorting follow the
//! conventions a search UI expects from a real engine:
//!
//! - every whitespace-separated term must occur (case-insensitively) in one
//!   of the text fields
//! - filters on the same facet are OR-ed, filters on different facets AND-ed;
//!   a nested filter requires every segment of its chain to match
//! - `bestmatch` (or no sort field) orders by term frequency, any other sort
//!   field orders by that document field, missing values last
//! - aggregations are term buckets over the facet fields of the filtered set

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use searchkit_state::{AggregationFilter, QueryState, SearchResponse, SortOrder};

use super::{SearchApi, SuggestionApi};
use crate::error::SearchApiError;

/// Sort field meaning "order by relevance".
pub const BEST_MATCH: &str = "bestmatch";

const DEFAULT_SIZE: u32 = 10;
const MAX_SUGGESTIONS: usize = 10;

/// Reference backend searching a fixed list of JSON documents.
#[derive(Debug, Clone)]
pub struct InMemorySearchApi {
    documents: Vec<Value>,
    text_fields: Vec<String>,
    facets: Vec<String>,
    default_size: u32,
}

impl InMemorySearchApi {
    /// Create a backend searching `title` and `description`, with no facets.
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents,
            text_fields: vec!["title".to_string(), "description".to_string()],
            facets: Vec::new(),
            default_size: DEFAULT_SIZE,
        }
    }

    #[must_use]
    pub fn with_text_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets = facets.into_iter().map(Into::into).collect();
        self
    }

    /// Page size used when the query carries none.
    #[must_use]
    pub fn with_default_size(mut self, size: u32) -> Self {
        self.default_size = size.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Run the query synchronously.
    pub fn run(&self, query: &QueryState) -> Result<SearchResponse, SearchApiError> {
        if query.page == Some(0) {
            return Err(SearchApiError::invalid_request("page numbers start at 1"));
        }
        if query.size == Some(0) {
            return Err(SearchApiError::invalid_request("page size must be positive"));
        }

        let terms = tokenize(&query.query_string);
        let mut matched: Vec<(usize, &Value)> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let score = self.score(doc, &terms)?;
                matches_filters(doc, &query.aggregations).then_some((score, doc))
            })
            .collect();

        let order = query.sort_order.unwrap_or(SortOrder::Asc);
        match query.sort_by.as_deref() {
            None | Some(BEST_MATCH) => matched.sort_by(|a, b| b.0.cmp(&a.0)),
            Some(field) => matched.sort_by(|a, b| compare_field(a.1, b.1, field, order)),
        }

        let total = matched.len() as u64;
        let aggregations = self.aggregate(matched.iter().map(|(_, doc)| *doc));

        let size = query.size.unwrap_or(self.default_size) as usize;
        let page = query.page.unwrap_or(1) as usize;
        let hits = matched
            .into_iter()
            .skip((page - 1).saturating_mul(size))
            .take(size)
            .map(|(_, doc)| doc.clone())
            .collect();

        Ok(SearchResponse {
            aggregations,
            hits,
            total,
        })
    }

    /// Term-frequency score, or `None` if some term does not occur.
    fn score(&self, doc: &Value, terms: &[String]) -> Option<usize> {
        if terms.is_empty() {
            return Some(0);
        }
        let text: Vec<String> = self
            .text_fields
            .iter()
            .filter_map(|field| doc.get(field))
            .flat_map(text_values)
            .map(|value| value.to_lowercase())
            .collect();

        let mut score = 0;
        for term in terms {
            let hits: usize = text.iter().map(|value| value.matches(term.as_str()).count()).sum();
            if hits == 0 {
                return None;
            }
            score += hits;
        }
        Some(score)
    }

    fn aggregate<'a>(&self, docs: impl Iterator<Item = &'a Value>) -> Map<String, Value> {
        let mut counts: BTreeMap<&str, BTreeMap<String, u64>> = self
            .facets
            .iter()
            .map(|facet| (facet.as_str(), BTreeMap::new()))
            .collect();

        for doc in docs {
            for (facet, buckets) in &mut counts {
                let Some(value) = doc.get(*facet) else {
                    continue;
                };
                for key in text_values(value) {
                    *buckets.entry(key).or_default() += 1;
                }
            }
        }

        counts
            .into_iter()
            .map(|(facet, buckets)| {
                let mut buckets: Vec<(String, u64)> = buckets.into_iter().collect();
                buckets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                let buckets: Vec<Value> = buckets
                    .into_iter()
                    .map(|(key, count)| json!({"key": key, "doc_count": count}))
                    .collect();
                (facet.to_string(), json!({ "buckets": buckets }))
            })
            .collect()
    }

    fn suggestions_for(&self, text: &str) -> Vec<String> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let Some(field) = self.text_fields.first() else {
            return Vec::new();
        };

        let mut seen = BTreeSet::new();
        let mut suggestions = Vec::new();
        for value in self
            .documents
            .iter()
            .filter_map(|doc| doc.get(field))
            .flat_map(text_values)
        {
            if value.to_lowercase().contains(&needle) && seen.insert(value.clone()) {
                suggestions.push(value);
                if suggestions.len() == MAX_SUGGESTIONS {
                    break;
                }
            }
        }
        suggestions
    }
}

#[async_trait]
impl SearchApi for InMemorySearchApi {
    async fn search(&self, query: &QueryState) -> Result<SearchResponse, SearchApiError> {
        let response = self.run(query)?;
        debug!(
            total = response.total,
            returned = response.hits.len(),
            "in-memory search"
        );
        Ok(response)
    }
}

#[async_trait]
impl SuggestionApi for InMemorySearchApi {
    async fn suggest(&self, text: &str) -> Result<Vec<String>, SearchApiError> {
        Ok(self.suggestions_for(text))
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// String forms of a scalar or of every scalar in an array.
fn text_values(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(b) => vec![b.to_string()],
        Value::Array(items) => items.iter().flat_map(text_values).collect(),
        Value::Null | Value::Object(_) => Vec::new(),
    }
}

fn matches_segment(doc: &Value, field: &str, value: &str) -> bool {
    doc.get(field)
        .is_some_and(|found| text_values(found).iter().any(|v| v == value))
}

fn matches_filter(doc: &Value, filter: &AggregationFilter) -> bool {
    filter
        .path()
        .into_iter()
        .all(|(field, value)| matches_segment(doc, field, value))
}

fn matches_filters(doc: &Value, filters: &[AggregationFilter]) -> bool {
    let mut by_facet: BTreeMap<&str, Vec<&AggregationFilter>> = BTreeMap::new();
    for filter in filters {
        by_facet.entry(filter.field.as_str()).or_default().push(filter);
    }
    by_facet
        .values()
        .all(|group| group.iter().any(|filter| matches_filter(doc, filter)))
}

fn compare_field(a: &Value, b: &Value, field: &str, order: SortOrder) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(x), Some(y)) => {
            let ordering = compare_values(x, y);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents() -> Vec<Value> {
        vec![
            json!({"id": 1, "title": "Higgs boson discovery", "type": "publication", "subtype": "article", "year": 2012}),
            json!({"id": 2, "title": "Higgs dataset", "description": "Higgs Higgs", "type": "dataset", "year": 2015}),
            json!({"id": 3, "title": "Dark matter search", "type": "publication", "subtype": "thesis", "year": 2019}),
            json!({"id": 4, "title": "Detector software", "type": "software"}),
        ]
    }

    fn api() -> InMemorySearchApi {
        InMemorySearchApi::new(documents()).with_facets(["type", "subtype"])
    }

    fn ids(response: &SearchResponse) -> Vec<i64> {
        response
            .hits
            .iter()
            .filter_map(|hit| hit["id"].as_i64())
            .collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let response = api().run(&QueryState::default()).unwrap();
        assert_eq!(response.total, 4);
        assert_eq!(ids(&response), vec![1, 2, 3, 4]);
    }

    #[test]
    fn text_match_orders_by_frequency() {
        let query = QueryState {
            query_string: "higgs".to_string(),
            ..QueryState::default()
        };
        let response = api().run(&query).unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(ids(&response), vec![2, 1]);
    }

    #[test]
    fn every_term_must_match() {
        let query = QueryState {
            query_string: "higgs matter".to_string(),
            ..QueryState::default()
        };
        assert_eq!(api().run(&query).unwrap().total, 0);
    }

    #[test]
    fn field_sort_puts_missing_values_last() {
        let query = QueryState {
            sort_by: Some("year".to_string()),
            sort_order: Some(SortOrder::Desc),
            ..QueryState::default()
        };
        let response = api().run(&query).unwrap();
        assert_eq!(ids(&response), vec![3, 2, 1, 4]);
    }

    #[test]
    fn filters_or_within_facet_and_across_facets() {
        let query = QueryState {
            aggregations: vec![
                AggregationFilter::new("type", "dataset"),
                AggregationFilter::new("type", "software"),
            ],
            ..QueryState::default()
        };
        assert_eq!(ids(&api().run(&query).unwrap()), vec![2, 4]);

        let nested = QueryState {
            aggregations: vec![
                AggregationFilter::new("type", "publication")
                    .with_child(AggregationFilter::new("subtype", "thesis")),
            ],
            ..QueryState::default()
        };
        assert_eq!(ids(&api().run(&nested).unwrap()), vec![3]);
    }

    #[test]
    fn pagination_slices_hits_but_not_total() {
        let query = QueryState {
            page: Some(2),
            size: Some(3),
            ..QueryState::default()
        };
        let response = api().run(&query).unwrap();
        assert_eq!(response.total, 4);
        assert_eq!(ids(&response), vec![4]);
    }

    #[test]
    fn aggregations_count_filtered_documents() {
        let response = api().run(&QueryState::default()).unwrap();
        assert_eq!(
            response.aggregations["type"]["buckets"][0],
            json!({"key": "publication", "doc_count": 2})
        );
        assert_eq!(
            response.aggregations["subtype"]["buckets"]
                .as_array()
                .map(Vec::len),
            Some(2)
        );
    }

    #[test]
    fn zero_page_is_rejected() {
        let query = QueryState {
            page: Some(0),
            ..QueryState::default()
        };
        assert_eq!(api().run(&query).unwrap_err().kind(), "invalid_request");
    }

    #[test]
    fn suggestions_complete_titles() {
        let api = api();
        assert_eq!(
            api.suggestions_for("HIGGS"),
            vec!["Higgs boson discovery".to_string(), "Higgs dataset".to_string()]
        );
        assert!(api.suggestions_for("  ").is_empty());
    }
}
