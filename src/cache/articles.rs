//! Article index: articles by id, with an advisory lookup by title.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::ArticleRecord;
use crate::domain::types::ArticleId;

use super::config::CacheConfig;
use super::index::UniqueIndex;
use super::keys::{NormalizedKey, title_key};
use super::lock::{rw_read, rw_write};
use super::stats::{record_invalidation, record_lookup};

const SOURCE: &str = "cache::articles";
const INDEX: &str = "articles";

struct ArticleEntries {
    by_id: HashMap<ArticleId, ArticleRecord>,
    by_title: UniqueIndex<NormalizedKey, ArticleRecord>,
}

/// Cache-aside store for articles.
///
/// The id map decides hit or miss. The title map is best effort: titles are
/// not unique, the last `put` wins a colliding key, and a key derived from an
/// earlier title stays behind after a rename until the article is removed
/// under that same title.
pub struct ArticleIndex {
    enabled: bool,
    entries: RwLock<ArticleEntries>,
}

impl ArticleIndex {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enable_article_cache,
            entries: RwLock::new(ArticleEntries {
                by_id: HashMap::new(),
                by_title: UniqueIndex::new(title_key),
            }),
        }
    }

    pub fn get(&self, id: ArticleId) -> Option<ArticleRecord> {
        if !self.enabled {
            return None;
        }
        let found = rw_read(&self.entries, SOURCE, "get")
            .by_id
            .get(&id)
            .cloned();
        record_lookup(INDEX, found.is_some());
        found
    }

    pub fn get_by_title(&self, title: &str) -> Option<ArticleRecord> {
        if !self.enabled {
            return None;
        }
        rw_read(&self.entries, SOURCE, "get_by_title")
            .by_title
            .get(&NormalizedKey::new(title))
            .cloned()
    }

    pub fn put(&self, article: ArticleRecord) {
        if !self.enabled {
            return;
        }
        let mut entries = rw_write(&self.entries, SOURCE, "put");
        entries.by_title.insert(&article);
        entries.by_id.insert(article.id, article);
    }

    /// Drop the article. The title entry is derived from the *stored* copy,
    /// and only removed while it still points at this id.
    pub fn remove(&self, id: ArticleId) -> Option<ArticleRecord> {
        if !self.enabled {
            return None;
        }
        let mut entries = rw_write(&self.entries, SOURCE, "remove");
        let removed = entries.by_id.remove(&id)?;
        entries.by_title.remove(&removed);
        record_invalidation(INDEX);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn title_key_count(&self) -> usize {
        rw_read(&self.entries, SOURCE, "title_key_count")
            .by_title
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn sample_article(id: i64, title: &str) -> ArticleRecord {
        ArticleRecord {
            id: ArticleId(id),
            title: title.to_string(),
            content: "lang".to_string(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn article_roundtrip() {
        let index = ArticleIndex::new(&CacheConfig::default());

        assert!(index.get(ArticleId(1)).is_none());

        index.put(sample_article(1, "Go"));

        let cached = index.get(ArticleId(1)).expect("cached article");
        assert_eq!(cached.title, "Go");
        let by_title = index.get_by_title("GO").expect("cached by title");
        assert_eq!(by_title.id, ArticleId(1));

        let removed = index.remove(ArticleId(1)).expect("removed article");
        assert_eq!(removed.id, ArticleId(1));
        assert!(index.get(ArticleId(1)).is_none());
        assert!(index.get_by_title("go").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn retitled_put_keeps_previous_title_mapping() {
        let index = ArticleIndex::new(&CacheConfig::default());

        let mut article = sample_article(1, "Go");
        index.put(article.clone());
        article.title = "Rust".to_string();
        index.put(article);

        let stale = index.get_by_title("go").expect("old title still mapped");
        assert_eq!(stale.id, ArticleId(1));
        assert_eq!(stale.title, "Go");
        assert_eq!(index.get_by_title("rust").map(|a| a.id), Some(ArticleId(1)));
        assert_eq!(index.title_key_count(), 2);
    }

    #[test]
    fn remove_uses_stored_title() {
        let index = ArticleIndex::new(&CacheConfig::default());

        let mut article = sample_article(1, "Go");
        index.put(article.clone());
        article.title = "Rust".to_string();
        index.put(article);

        index.remove(ArticleId(1));

        assert!(index.get_by_title("rust").is_none());
        // The orphan from the earlier title is advisory and survives.
        assert!(index.get_by_title("go").is_some());
    }

    #[test]
    fn remove_keeps_title_owned_by_other_article() {
        let index = ArticleIndex::new(&CacheConfig::default());

        index.put(sample_article(1, "Go"));
        index.put(sample_article(2, "go"));

        index.remove(ArticleId(1));

        assert_eq!(index.get_by_title("Go").map(|a| a.id), Some(ArticleId(2)));
        assert!(index.get(ArticleId(2)).is_some());
    }

    #[test]
    fn remove_missing_article_is_noop() {
        let index = ArticleIndex::new(&CacheConfig::default());
        assert!(index.remove(ArticleId(9)).is_none());
    }

    #[test]
    fn disabled_index_stores_nothing() {
        let config = CacheConfig {
            enable_article_cache: false,
            ..Default::default()
        };
        let index = ArticleIndex::new(&config);

        index.put(sample_article(1, "Go"));

        assert!(index.get(ArticleId(1)).is_none());
        assert!(index.get_by_title("go").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn article_index_recovers_from_poisoned_lock() {
        let index = ArticleIndex::new(&CacheConfig::default());

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = index
                .entries
                .write()
                .expect("entries lock should be acquired");
            panic!("poison entries lock");
        }));

        index.put(sample_article(1, "Go"));
        assert!(index.get(ArticleId(1)).is_some());
    }
}
