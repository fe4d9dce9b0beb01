//! SearchKit core: store, action creators and the search API seam.
//!
//! A [`SearchKit`] ties together:
//!
//! - a [`Store`] holding the [`AppState`](searchkit_state::AppState) and
//!   applying the reducer to every dispatched action,
//! - an injected [`SearchApi`] (and optionally a [`SuggestionApi`]),
//! - an optional [`UrlQueryStringHandler`](searchkit_url::UrlQueryStringHandler)
//!   keeping the location in sync with the query.
//!
//! Its async methods are the action creators: each dispatches one or more
//! actions and, when the query changed, runs the search sequence
//! `RESULTS_LOADING` then `RESULTS_FETCH_SUCCESS` or `RESULTS_FETCH_ERROR`.

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod kit;
pub mod store;

pub use api::{InMemorySearchApi, SearchApi, SuggestionApi};
pub use config::{BackendSettings, SearchKitConfig, SearchSettings, UrlSettings};
pub use error::{ConfigError, SearchApiError};
pub use kit::{ExecuteOptions, SearchKit, SearchKitBuilder};
pub use store::{ActionLog, Store};
