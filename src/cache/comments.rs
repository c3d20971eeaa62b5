//! Comment index: comments by id, by author and by owning article.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::CommentRecord;
use crate::domain::types::{ArticleId, CommentId};

use super::config::CacheConfig;
use super::index::MultiIndex;
use super::keys::{NormalizedKey, author_key, owning_article_key};
use super::lock::{rw_read, rw_write};
use super::stats::{record_invalidation, record_lookup};

const SOURCE: &str = "cache::comments";
const INDEX: &str = "comments";

struct CommentEntries {
    by_id: HashMap<CommentId, CommentRecord>,
    by_author: MultiIndex<NormalizedKey, CommentRecord>,
    by_article: MultiIndex<ArticleId, CommentRecord>,
}

impl CommentEntries {
    fn insert(&mut self, comment: CommentRecord) {
        self.by_author.insert(&comment);
        self.by_article.insert(&comment);
        self.by_id.insert(comment.id, comment);
    }

    fn remove(&mut self, id: CommentId) -> Option<CommentRecord> {
        let removed = self.by_id.remove(&id);
        self.by_author.remove(id);
        self.by_article.remove(id);
        removed
    }
}

/// Cache-aside store for comments.
///
/// `put` appends to the author list and, for attached comments, to the
/// article list without checking for an earlier entry with the same id.
/// Putting one state twice therefore leaves a duplicate in both lists until
/// the next `remove`. Write paths that may revisit a cached comment should use
/// [`CommentIndex::replace`].
///
/// The list lookups return an empty vector for keys that were never
/// populated, so "nothing cached" and "cached as empty" look the same.
pub struct CommentIndex {
    enabled: bool,
    entries: RwLock<CommentEntries>,
}

impl CommentIndex {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enable_comment_cache,
            entries: RwLock::new(CommentEntries {
                by_id: HashMap::new(),
                by_author: MultiIndex::new(author_key),
                by_article: MultiIndex::new(owning_article_key),
            }),
        }
    }

    pub fn get(&self, id: CommentId) -> Option<CommentRecord> {
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

    pub fn comments_by_author(&self, author: &str) -> Vec<CommentRecord> {
        if !self.enabled {
            return Vec::new();
        }
        rw_read(&self.entries, SOURCE, "comments_by_author")
            .by_author
            .get(&NormalizedKey::new(author))
            .to_vec()
    }

    pub fn comments_by_article(&self, article_id: ArticleId) -> Vec<CommentRecord> {
        if !self.enabled {
            return Vec::new();
        }
        rw_read(&self.entries, SOURCE, "comments_by_article")
            .by_article
            .get(&article_id)
            .to_vec()
    }

    pub fn put(&self, comment: CommentRecord) {
        if !self.enabled {
            return;
        }
        rw_write(&self.entries, SOURCE, "put").insert(comment);
    }

    /// Drop any cached state for `comment.id`, then `put` the new state, as
    /// one atomic step.
    pub fn replace(&self, comment: CommentRecord) {
        if !self.enabled {
            return;
        }
        let mut entries = rw_write(&self.entries, SOURCE, "replace");
        entries.remove(comment.id);
        entries.insert(comment);
    }

    /// Remove the comment from the id map and from every author and article
    /// list it was appended to, matching entries by id.
    pub fn remove(&self, id: CommentId) -> Option<CommentRecord> {
        if !self.enabled {
            return None;
        }
        let removed = rw_write(&self.entries, SOURCE, "remove").remove(id);
        if removed.is_some() {
            record_invalidation(INDEX);
        }
        removed
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
