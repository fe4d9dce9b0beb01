//! Error types for parsing state values from text.

use thiserror::Error;

/// Errors raised when a textual value cannot become a state value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateError {
    /// Sort order was not `asc` or `desc`.
    #[error("invalid sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    /// Layout was not `list` or `grid`.
    #[error("invalid layout '{0}', expected 'list' or 'grid'")]
    InvalidLayout(String),

    /// Facet filter text did not follow `field:value[+field:value]`.
    #[error("invalid aggregation filter '{input}': {reason}")]
    InvalidFilter {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, StateError>;
