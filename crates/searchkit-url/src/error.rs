use thiserror::Error;

/// Errors from reading the current location.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The location could not be parsed as a URL or URL reference.
    #[error("invalid location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
}
