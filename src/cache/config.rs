//! Cache configuration.
//!
//! Toggles the article and comment indexes via the `[cache]` table of
//! `lectern.toml`. A disabled index never reports a hit and never stores
//! anything, so every read falls through to the store.

use serde::Deserialize;

/// Cache configuration from `lectern.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the article index.
    pub enable_article_cache: bool,
    /// Enable the comment index.
    pub enable_comment_cache: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable_article_cache: true,
            enable_comment_cache: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enable_article_cache: settings.enable_article_cache,
            enable_comment_cache: settings.enable_comment_cache,
        }
    }
}

impl CacheConfig {
    /// Returns true if any index is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enable_article_cache || self.enable_comment_cache
    }
}
