//! Secondary index building blocks.
//!
//! Both index kinds are parameterized by a key-extraction function so the
//! owning cache only declares *which* attribute it indexes. They carry no
//! locking of their own; the owning cache wraps its primary map and all of
//! its secondaries in a single lock.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::keys::Indexed;

pub(crate) type KeyFn<K, V> = fn(&V) -> Option<K>;

/// Single-valued secondary index. Last write wins on key collision.
pub(crate) struct UniqueIndex<K, V> {
    key_of: KeyFn<K, V>,
    entries: HashMap<K, V>,
}

impl<K, V> UniqueIndex<K, V>
where
    K: Eq + Hash,
    V: Indexed,
{
    pub(crate) fn new(key_of: KeyFn<K, V>) -> Self {
        Self {
            key_of,
            entries: HashMap::new(),
        }
    }

    /// Insert `value` under its current key. Entries under keys derived from
    /// earlier states of the same value are left untouched.
    pub(crate) fn insert(&mut self, value: &V) {
        if let Some(key) = (self.key_of)(value) {
            self.entries.insert(key, value.clone());
        }
    }

    /// Remove the entry derived from `value`, provided it still refers to
    /// `value`'s identifier.
    pub(crate) fn remove(&mut self, value: &V) -> bool {
        let Some(key) = (self.key_of)(value) else {
            return false;
        };
        match self.entries.get(&key) {
            Some(current) if current.id() == value.id() => {
                self.entries.remove(&key);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Multi-valued secondary index keeping insertion order under each key.
///
/// Inserts never deduplicate. Every key a value was ever inserted under is
/// remembered, so [`MultiIndex::remove`] clears the value from all of them,
/// including keys derived from states the value no longer has.
pub(crate) struct MultiIndex<K, V: Indexed> {
    key_of: KeyFn<K, V>,
    lists: HashMap<K, Vec<V>>,
    placements: HashMap<V::Id, HashSet<K>>,
}

impl<K, V> MultiIndex<K, V>
where
    K: Eq + Hash + Clone,
    V: Indexed,
{
    pub(crate) fn new(key_of: KeyFn<K, V>) -> Self {
        Self {
            key_of,
            lists: HashMap::new(),
            placements: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, value: &V) {
        if let Some(key) = (self.key_of)(value) {
            self.placements
                .entry(value.id())
                .or_default()
                .insert(key.clone());
            self.lists.entry(key).or_default().push(value.clone());
        }
    }

    /// Filter every entry with identifier `id` out of every list it joined.
    /// Returns how many list entries were dropped.
    pub(crate) fn remove(&mut self, id: V::Id) -> usize {
        let Some(keys) = self.placements.remove(&id) else {
            return 0;
        };

        let mut removed = 0;
        for key in keys {
            if let Some(list) = self.lists.get_mut(&key) {
                let before = list.len();
                list.retain(|entry| entry.id() != id);
                removed += before - list.len();
                if list.is_empty() {
                    self.lists.remove(&key);
                }
            }
        }
        removed
    }

    /// Entries under `key`; empty when the key was never populated.
    pub(crate) fn get(&self, key: &K) -> &[V] {
        self.lists.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    #[cfg(test)]
    pub(crate) fn key_count(&self) -> usize {
        self.lists.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::{NormalizedKey, author_key, title_key};
    use crate::domain::entities::{ArticleRecord, CommentRecord};
    use crate::domain::types::{ArticleId, CommentId};

    fn article(id: i64, title: &str) -> ArticleRecord {
        ArticleRecord {
            id: ArticleId(id),
            title: title.into(),
            content: String::new(),
            comments: Vec::new(),
        }
    }

    fn comment(id: i64, author: &str) -> CommentRecord {
        CommentRecord {
            id: CommentId(id),
            author: author.into(),
            text: String::new(),
            article_id: None,
        }
    }

    #[test]
    fn unique_remove_ignores_entry_owned_by_another_id() {
        let mut index = UniqueIndex::new(title_key);
        let first = article(1, "Rust");
        let second = article(2, "rust");

        index.insert(&first);
        index.insert(&second);

        assert!(!index.remove(&first));
        let key = NormalizedKey::new("RUST");
        assert_eq!(index.get(&key).map(|a| a.id), Some(ArticleId(2)));

        assert!(index.remove(&second));
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn multi_insert_appends_without_dedup() {
        let mut index = MultiIndex::new(author_key);
        let ann = comment(1, "Ann");

        index.insert(&ann);
        index.insert(&ann);

        assert_eq!(index.get(&NormalizedKey::new("ann")).len(), 2);
        assert_eq!(index.key_count(), 1);
    }

    #[test]
    fn multi_remove_clears_every_key_ever_joined() {
        let mut index = MultiIndex::new(author_key);
        let mut renamed = comment(1, "Ann");
        index.insert(&renamed);
        renamed.author = "Bob".into();
        index.insert(&renamed);
        index.insert(&comment(2, "Bob"));

        assert_eq!(index.remove(CommentId(1)), 2);

        assert!(index.get(&NormalizedKey::new("ann")).is_empty());
        let bob = index.get(&NormalizedKey::new("bob"));
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].id, CommentId(2));
    }

    #[test]
    fn multi_remove_of_unknown_id_is_noop() {
        let mut index: MultiIndex<NormalizedKey, CommentRecord> = MultiIndex::new(author_key);
        assert_eq!(index.remove(CommentId(42)), 0);
    }

    #[test]
    fn multi_skips_values_without_key() {
        let mut index = MultiIndex::new(crate::cache::keys::owning_article_key);
        index.insert(&comment(1, "Ann"));
        assert_eq!(index.key_count(), 0);
    }
}
