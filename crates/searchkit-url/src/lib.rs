//! URL query-string synchronization.
//!
//! [`UrlQueryStringHandler`] decodes the current location into a
//! [`QueryState`](searchkit_state::QueryState) and writes the state back as a
//! query string. The browser location is abstracted behind [`History`] so the
//! handler works the same in a WASM host, a desktop shell or a test.
//!
//! Recognized parameters (names configurable via [`UrlParamsMapping`]):
//!
//! | Param   | Field        |
//! |---------|--------------|
//! | `q`     | query string |
//! | `sort`  | sort field   |
//! | `order` | `asc`/`desc` |
//! | `p`     | page         |
//! | `s`     | page size    |
//! | `l`     | layout       |
//! | `f`     | facet filter (repeatable) |
//!
//! Anything else in the query string is ignored.

#![deny(unsafe_code)]

pub mod error;
pub mod handler;
pub mod history;
pub mod params;

pub use error::UrlError;
pub use handler::{UrlHandlerConfig, UrlQueryStringHandler};
pub use history::{History, MemoryHistory};
pub use params::{DefaultValidator, QueryField, UrlParamValidator, UrlParamsMapping};
