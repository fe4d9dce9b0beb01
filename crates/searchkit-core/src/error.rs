//! Error types for the search seam and configuration.

use std::path::PathBuf;

use thiserror::Error;

use searchkit_state::SearchFailure;

/// Errors returned by a search or suggestion backend.
///
/// These never reach the caller of an action creator: they are converted to
/// a [`SearchFailure`] and dispatched as an error action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SearchApiError {
    /// Backend could not be reached.
    #[error("search backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// Backend rejected the query.
    #[error("invalid search request: {reason}")]
    InvalidRequest { reason: String },

    /// Backend failed while answering.
    #[error("search backend error: {reason}")]
    Backend { reason: String },
}

impl SearchApiError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            reason: err.to_string(),
        }
    }

    pub fn invalid_request(err: impl std::fmt::Display) -> Self {
        Self::InvalidRequest {
            reason: err.to_string(),
        }
    }

    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend {
            reason: err.to_string(),
        }
    }

    /// Short category label carried in the failure action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Backend { .. } => "backend",
        }
    }
}

impl From<SearchApiError> for SearchFailure {
    fn from(err: SearchApiError) -> Self {
        SearchFailure::new(err.kind(), err.to_string())
    }
}

/// Errors from loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
