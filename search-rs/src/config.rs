use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for the backend-facing search path.
///
/// Every value has a working default; a configuration file only needs to
/// name the keys it overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfiguration {
    /// Hard cap on the number of hits a single search may return.
    #[serde(default = "default_max_search_size")]
    pub max_search_size: usize,
    /// How long the backend keeps a scroll cursor alive between fetches,
    /// in seconds.
    #[serde(default = "default_scroll_keep_alive_secs")]
    pub scroll_keep_alive_secs: u64,
    #[serde(default)]
    pub highlight: HighlightConfiguration,
}

/// Snippet highlighting parameters, matching the backend highlighter knobs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HighlightConfiguration {
    #[serde(default = "default_pre_tag")]
    pub pre_tag: String,
    #[serde(default = "default_post_tag")]
    pub post_tag: String,
    #[serde(default = "default_fragment_size")]
    pub fragment_size: usize,
    #[serde(default = "default_number_of_fragments")]
    pub number_of_fragments: usize,
}

fn default_max_search_size() -> usize {
    100
}

fn default_scroll_keep_alive_secs() -> u64 {
    60
}

fn default_pre_tag() -> String {
    "<mark>".to_string()
}

fn default_post_tag() -> String {
    "</mark>".to_string()
}

fn default_fragment_size() -> usize {
    100
}

fn default_number_of_fragments() -> usize {
    2
}

impl Default for SearchConfiguration {
    fn default() -> Self {
        Self {
            max_search_size: default_max_search_size(),
            scroll_keep_alive_secs: default_scroll_keep_alive_secs(),
            highlight: HighlightConfiguration::default(),
        }
    }
}

impl Default for HighlightConfiguration {
    fn default() -> Self {
        Self {
            pre_tag: default_pre_tag(),
            post_tag: default_post_tag(),
            fragment_size: default_fragment_size(),
            number_of_fragments: default_number_of_fragments(),
        }
    }
}

impl SearchConfiguration {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::SearchError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| crate::error::SearchError::Config(e.to_string()))
    }

    pub fn scroll_keep_alive(&self) -> Duration {
        Duration::from_secs(self.scroll_keep_alive_secs)
    }
}
