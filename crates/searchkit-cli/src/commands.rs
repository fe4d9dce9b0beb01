//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use searchkit_core::{ActionLog, InMemorySearchApi, SearchKit, SearchKitConfig};
use searchkit_state::{Action, AggregationFilter, AppState, QueryState, SearchFailure};
use searchkit_url::{History, MemoryHistory, UrlQueryStringHandler};

use crate::cli::{RunArgs, UrlArgs};

/// Result of a `run` invocation.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: AppState,
    /// Location after the last update, if URL sync is enabled.
    pub location: Option<String>,
    /// Every dispatched action, oldest first.
    pub trace: Vec<Action>,
    /// Document field shown as the hit title.
    pub title_field: String,
}

impl RunOutcome {
    pub fn has_error(&self) -> bool {
        self.state.results.has_error()
    }

    pub fn report(&self) -> RunReport<'_> {
        let results = &self.state.results;
        RunReport {
            location: self.location.as_deref(),
            query: &self.state.query,
            total: results.data.total,
            hits: &results.data.hits,
            aggregations: &results.data.aggregations,
            error: results.error.as_ref(),
        }
    }
}

/// JSON view of a [`RunOutcome`].
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub location: Option<&'a str>,
    pub query: &'a QueryState,
    pub total: u64,
    pub hits: &'a [Value],
    pub aggregations: &'a serde_json::Map<String, Value>,
    pub error: Option<&'a SearchFailure>,
}

/// Boot a kit over the documents in `args.data` and apply the requested updates.
///
/// Updates run in the order a user would perform them: text, sorting, page
/// size, filters, page, layout. Every update except layout runs a search.
pub fn run_search(args: &RunArgs, config: &SearchKitConfig) -> Result<RunOutcome> {
    let documents = load_documents(&args.data)?;
    info!(documents = documents.len(), path = %args.data.display(), "loaded documents");

    let backend = Arc::new(
        InMemorySearchApi::new(documents)
            .with_text_fields(config.backend.text_fields.iter().cloned())
            .with_facets(config.backend.facets.iter().cloned())
            .with_default_size(config.backend.default_size),
    );
    let history = Arc::new(MemoryHistory::new(args.url.clone()));
    let kit = SearchKit::from_config(config, backend, Some(history.clone() as Arc<dyn History>));
    let log = ActionLog::attach(kit.store());

    let search_on_init = config.search.search_on_init && !args.no_search_on_init;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(apply_updates(&kit, args, search_on_init));

    let location = kit.url_handler().map(|_| history.location());
    debug!(actions = log.len(), location = ?location, "run finished");

    Ok(RunOutcome {
        state: kit.state(),
        location,
        trace: log.actions(),
        title_field: config
            .backend
            .text_fields
            .first()
            .cloned()
            .unwrap_or_else(|| "title".to_string()),
    })
}

async fn apply_updates(kit: &SearchKit, args: &RunArgs, search_on_init: bool) {
    kit.on_app_initialized(search_on_init).await;

    if let Some(query) = &args.query {
        kit.update_query_string(query.as_str()).await;
    }
    match (&args.sort_by, args.sort_order) {
        (Some(sort_by), Some(order)) => {
            kit.update_query_sorting(sort_by.as_str(), order.into()).await;
        }
        (Some(sort_by), None) => kit.update_query_sort_by(sort_by.as_str()).await,
        (None, Some(order)) => kit.update_query_sort_order(order.into()).await,
        (None, None) => {}
    }
    if let Some(size) = args.size {
        kit.update_results_per_page(size).await;
    }
    for filter in &args.filter {
        kit.update_query_aggregation(filter.clone()).await;
    }
    if let Some(page) = args.page {
        kit.update_query_pagination_page(page).await;
    }
    if let Some(layout) = args.layout {
        kit.update_results_layout(layout.into()).await;
    }
}

/// Decode `args.url` over the configured default query.
pub fn decode_url(args: &UrlArgs, config: &SearchKitConfig) -> Result<QueryState> {
    let mut current = QueryState::default();
    current.apply(&config.defaults);

    let handler = UrlQueryStringHandler::with_config(
        Arc::new(MemoryHistory::new(args.url.clone())),
        config.url.handler_config(),
    );
    let state = handler
        .decode(&args.url, &current)
        .with_context(|| format!("cannot decode location {:?}", args.url))?;
    Ok(state)
}

/// Read a JSON array of documents.
pub fn load_documents(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    match value {
        Value::Array(documents) => Ok(documents),
        other => bail!(
            "{} must hold a JSON array of documents, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

/// Filters selected in `state` as their text form.
pub fn selected_filters(state: &QueryState) -> Vec<String> {
    state
        .aggregations
        .iter()
        .map(AggregationFilter::to_string)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
