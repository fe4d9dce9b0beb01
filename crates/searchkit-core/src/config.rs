//! SearchKit configuration - persisted as TOML.
//!
//! ```toml
//! [url]
//! enabled = true
//! keep_history = true
//!
//! [url.params]
//! query_string = "q"
//!
//! [search]
//! search_on_init = true
//!
//! [defaults]
//! sort_by = "bestmatch"
//! size = 10
//!
//! [backend]
//! text_fields = ["title", "description"]
//! facets = ["type"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use searchkit_state::QueryStatePatch;
use searchkit_url::{UrlHandlerConfig, UrlParamsMapping};

use crate::error::ConfigError;

// =============================================================================
// ROOT CONFIG
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKitConfig {
    /// URL synchronization.
    pub url: UrlSettings,

    /// Search behavior.
    pub search: SearchSettings,

    /// Initial query declared by the host, applied before reading the URL.
    pub defaults: QueryStatePatch,

    /// Settings of the built-in in-memory backend.
    pub backend: BackendSettings,
}

impl SearchKitConfig {
    /// Load configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given, else from the default path if it exists,
    /// else fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }
        let default_path = Self::default_path();
        if default_path.is_file() {
            Self::load_from(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file location in the user's config directory.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "SearchKit", "searchkit")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("searchkit.toml"))
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlSettings {
    /// Synchronize the query with the URL at all.
    pub enabled: bool,
    /// Push history entries instead of replacing the current one.
    pub keep_history: bool,
    /// Parameter names.
    pub params: UrlParamsMapping,
}

impl Default for UrlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            keep_history: true,
            params: UrlParamsMapping::default(),
        }
    }
}

impl UrlSettings {
    pub fn handler_config(&self) -> UrlHandlerConfig {
        UrlHandlerConfig {
            keep_history: self.keep_history,
            params: self.params.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Run a search right after the state is read from the URL.
    pub search_on_init: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            search_on_init: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Document fields searched by the free-text query.
    pub text_fields: Vec<String>,
    /// Document fields aggregated into facets.
    pub facets: Vec<String>,
    /// Page size when the query carries none.
    pub default_size: u32,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            text_fields: vec!["title".to_string(), "description".to_string()],
            facets: Vec::new(),
            default_size: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use searchkit_state::SortOrder;

    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: SearchKitConfig = toml::from_str(
            r#"
            [url]
            keep_history = false

            [url.params]
            query_string = "text"

            [defaults]
            sort_by = "mostrecent"
            sortOrder = "desc"
            size = 20

            [backend]
            facets = ["type"]
            "#,
        )
        .unwrap();

        assert!(config.url.enabled);
        assert!(!config.url.keep_history);
        assert_eq!(config.url.params.query_string, "text");
        assert_eq!(config.url.params.page, "p");
        assert!(config.search.search_on_init);
        assert_eq!(config.defaults.sort_by.as_deref(), Some("mostrecent"));
        assert_eq!(config.defaults.sort_order, Some(SortOrder::Desc));
        assert_eq!(config.defaults.size, Some(20));
        assert_eq!(config.backend.facets, vec!["type".to_string()]);
        assert_eq!(config.backend.default_size, 10);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = SearchKitConfig::default();
        config.search.search_on_init = false;
        config.backend.facets = vec!["type".to_string(), "year".to_string()];

        config.save_to(&path).unwrap();
        let loaded = SearchKitConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn unreadable_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = SearchKitConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn explicit_path_is_required_to_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(SearchKitConfig::load_or_default(Some(&path)).is_err());
    }
}
