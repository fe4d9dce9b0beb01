//! Action creators.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use searchkit_state::{
    Action, AggregationFilter, AppState, Layout, QueryState, QueryStatePatch, SortOrder,
};
use searchkit_url::{History, UrlQueryStringHandler};

use crate::api::{SearchApi, SuggestionApi};
use crate::config::SearchKitConfig;
use crate::store::{Store, lock};

/// Options for [`SearchKit::execute_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Write the query state to the URL before searching.
    pub update_url: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { update_url: true }
    }
}

impl ExecuteOptions {
    /// Search without touching the URL, used when the state came from it.
    pub fn without_url_update() -> Self {
        Self { update_url: false }
    }
}

/// Store plus the collaborators the action creators need.
///
/// Every creator dispatches its actions synchronously into the store and
/// awaits at most one backend call. Backend failures end up in the state as
/// error actions and are never returned.
pub struct SearchKit {
    store: Arc<Store>,
    search_api: Arc<dyn SearchApi>,
    suggestion_api: Option<Arc<dyn SuggestionApi>>,
    url_handler: Option<UrlQueryStringHandler>,
    url_base: Mutex<QueryState>,
}

impl SearchKit {
    /// Kit with a default store and no URL synchronization.
    pub fn new(search_api: Arc<dyn SearchApi>) -> Self {
        Self::builder(search_api).build()
    }

    pub fn builder(search_api: Arc<dyn SearchApi>) -> SearchKitBuilder {
        SearchKitBuilder::new(search_api)
    }

    /// Kit configured from `config`.
    ///
    /// URL synchronization is enabled when the config allows it and a
    /// `history` is supplied. The `[defaults]` patch seeds the initial query.
    pub fn from_config(
        config: &SearchKitConfig,
        search_api: Arc<dyn SearchApi>,
        history: Option<Arc<dyn History>>,
    ) -> Self {
        let mut initial = QueryState::default();
        initial.apply(&config.defaults);

        let mut builder = Self::builder(search_api).initial_query(initial);
        if config.url.enabled
            && let Some(history) = history
        {
            builder = builder.url_handler(UrlQueryStringHandler::with_config(
                history,
                config.url.handler_config(),
            ));
        }
        builder.build()
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.store.state()
    }

    pub fn url_handler(&self) -> Option<&UrlQueryStringHandler> {
        self.url_handler.as_ref()
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// Declare the host's initial query.
    pub async fn set_initial_state(&self, patch: QueryStatePatch) {
        self.store.dispatch(Action::SetQueryComponentInitialState(patch));
    }

    /// Load the query from the URL and optionally run the first search.
    ///
    /// The query state before the URL is read becomes the base every later
    /// history navigation decodes over.
    pub async fn on_app_initialized(&self, search_on_init: bool) {
        let base = self.store.query();
        lock(&self.url_base).clone_from(&base);
        self.load_from_url(&base);
        if search_on_init {
            self.execute_query(ExecuteOptions::without_url_update()).await;
        }
    }

    /// Re-read the URL after a back/forward navigation and search.
    ///
    /// Fields the location does not carry fall back to the startup base,
    /// not to the values of the entry navigated away from.
    pub async fn on_history_navigated(&self) {
        let base = lock(&self.url_base).clone();
        self.load_from_url(&base);
        self.execute_query(ExecuteOptions::without_url_update()).await;
    }

    pub async fn update_query_string(&self, query_string: impl Into<String>) {
        self.store.dispatch(Action::SetQueryString(query_string.into()));
        self.execute_query(ExecuteOptions::default()).await;
    }

    pub async fn update_query_sort_by(&self, sort_by: impl Into<String>) {
        self.store.dispatch(Action::SetQuerySortBy(sort_by.into()));
        self.execute_query(ExecuteOptions::default()).await;
    }

    pub async fn update_query_sort_order(&self, sort_order: SortOrder) {
        self.store.dispatch(Action::SetQuerySortOrder(sort_order));
        self.execute_query(ExecuteOptions::default()).await;
    }

    /// Change sort field and direction in one step.
    pub async fn update_query_sorting(&self, sort_by: impl Into<String>, sort_order: SortOrder) {
        self.store.dispatch(Action::SetQuerySorting {
            sort_by: sort_by.into(),
            sort_order,
        });
        self.execute_query(ExecuteOptions::default()).await;
    }

    pub async fn update_query_pagination_page(&self, page: u32) {
        self.store.dispatch(Action::SetQueryPaginationPage(page));
        self.execute_query(ExecuteOptions::default()).await;
    }

    pub async fn update_results_per_page(&self, size: u32) {
        self.store.dispatch(Action::SetQueryPaginationSize(size));
        self.execute_query(ExecuteOptions::default()).await;
    }

    /// Toggle `filter` and search.
    pub async fn update_query_aggregation(&self, filter: AggregationFilter) {
        self.store.dispatch(Action::SetQueryAggregation(filter));
        self.execute_query(ExecuteOptions::default()).await;
    }

    /// Switch the results layout. Only the URL is updated; no search runs.
    pub async fn update_results_layout(&self, layout: Layout) {
        self.store.dispatch(Action::SetResultsLayout(layout));
        self.write_url();
    }

    /// Clear text and filters and search again.
    pub async fn reset_query(&self) {
        self.store.dispatch(Action::ResetQuery);
        self.execute_query(ExecuteOptions::default()).await;
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Run the search for the current query state.
    pub async fn execute_query(&self, options: ExecuteOptions) {
        if options.update_url {
            self.write_url();
        }

        let query = self.store.query();
        self.store.dispatch(Action::ResultsLoading);
        info!(
            query = %query.query_string,
            page = ?query.page,
            filters = query.aggregations.len(),
            "search started"
        );

        match self.search_api.search(&query).await {
            Ok(response) => {
                info!(
                    total = response.total,
                    hits = response.hits.len(),
                    "search finished"
                );
                self.store.dispatch(Action::ResultsFetchSuccess(response));
            }
            Err(err) => {
                warn!(error = %err, "search failed");
                self.store.dispatch(Action::ResultsFetchError(err.into()));
            }
        }
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    /// Fetch completions for partially typed text.
    ///
    /// Empty text clears the suggestions without calling the backend.
    pub async fn update_suggestions(&self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            self.store.dispatch(Action::ClearSuggestions);
            return;
        }
        self.store.dispatch(Action::SetSuggestionString(text.clone()));

        let Some(api) = &self.suggestion_api else {
            debug!("no suggestion backend configured");
            return;
        };

        self.store.dispatch(Action::SuggestionLoading);
        match api.suggest(&text).await {
            Ok(suggestions) => {
                debug!(count = suggestions.len(), "suggestions fetched");
                self.store.dispatch(Action::SuggestionFetchSuccess(suggestions));
            }
            Err(err) => {
                warn!(error = %err, "suggestion fetch failed");
                self.store.dispatch(Action::SuggestionFetchError(err.into()));
            }
        }
    }

    pub async fn clear_suggestions(&self) {
        self.store.dispatch(Action::ClearSuggestions);
    }

    // =========================================================================
    // URL
    // =========================================================================

    fn load_from_url(&self, base: &QueryState) {
        let state = match &self.url_handler {
            Some(handler) => handler.get(base),
            None => self.store.query(),
        };
        self.store.dispatch(Action::SetStateFromUrl(state));
    }

    fn write_url(&self) {
        if let Some(handler) = &self.url_handler {
            handler.set(&self.store.query());
        }
    }
}

impl std::fmt::Debug for SearchKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchKit")
            .field("store", &self.store)
            .field("suggestions", &self.suggestion_api.is_some())
            .field("url_handler", &self.url_handler)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SearchKit`].
pub struct SearchKitBuilder {
    search_api: Arc<dyn SearchApi>,
    suggestion_api: Option<Arc<dyn SuggestionApi>>,
    url_handler: Option<UrlQueryStringHandler>,
    initial_query: QueryState,
}

impl SearchKitBuilder {
    fn new(search_api: Arc<dyn SearchApi>) -> Self {
        Self {
            search_api,
            suggestion_api: None,
            url_handler: None,
            initial_query: QueryState::default(),
        }
    }

    #[must_use]
    pub fn suggestion_api(mut self, api: Arc<dyn SuggestionApi>) -> Self {
        self.suggestion_api = Some(api);
        self
    }

    /// Enable URL synchronization.
    #[must_use]
    pub fn url_handler(mut self, handler: UrlQueryStringHandler) -> Self {
        self.url_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn initial_query(mut self, query: QueryState) -> Self {
        self.initial_query = query;
        self
    }

    pub fn build(self) -> SearchKit {
        debug!(
            url_sync = self.url_handler.is_some(),
            suggestions = self.suggestion_api.is_some(),
            "search kit built"
        );
        let state = AppState::with_query(self.initial_query.clone());
        SearchKit {
            store: Arc::new(Store::with_state(state)),
            search_api: self.search_api,
            suggestion_api: self.suggestion_api,
            url_handler: self.url_handler,
            url_base: Mutex::new(self.initial_query),
        }
    }
}
