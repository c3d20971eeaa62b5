//! Key derivation for the cache indexes.
//!
//! Case folding lives here and nowhere else: every secondary lookup goes
//! through [`NormalizedKey`], and every index learns its keys from one of the
//! extraction functions below.

use std::fmt;
use std::hash::Hash;

use crate::domain::entities::{ArticleRecord, CommentRecord};
use crate::domain::types::{ArticleId, CommentId};

/// Case-folded lookup key used by the title and author indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A value stored in an index, addressable by its primary identifier.
pub trait Indexed: Clone {
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn id(&self) -> Self::Id;
}

impl Indexed for ArticleRecord {
    type Id = ArticleId;

    fn id(&self) -> ArticleId {
        self.id
    }
}

impl Indexed for CommentRecord {
    type Id = CommentId;

    fn id(&self) -> CommentId {
        self.id
    }
}

pub(crate) fn title_key(article: &ArticleRecord) -> Option<NormalizedKey> {
    Some(NormalizedKey::new(&article.title))
}

pub(crate) fn author_key(comment: &CommentRecord) -> Option<NormalizedKey> {
    Some(NormalizedKey::new(&comment.author))
}

pub(crate) fn owning_article_key(comment: &CommentRecord) -> Option<ArticleId> {
    comment.article_id
}
