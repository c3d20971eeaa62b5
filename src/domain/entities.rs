//! Domain entities mirrored from persistent storage.

use serde::Serialize;

use crate::domain::types::{ArticleId, CommentId};

/// An article together with the comments the store currently attributes to it.
///
/// `comments` is a projection assembled by the store from each comment's
/// owning reference; it is never the source of truth for ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    /// Owning article. `None` only before the comment is attached.
    pub article_id: Option<ArticleId>,
}

impl ArticleRecord {
    /// Append `comment` to the in-memory projection, pointing it at this article.
    pub fn attach(&mut self, mut comment: CommentRecord) {
        comment.article_id = Some(self.id);
        self.comments.push(comment);
    }

    /// Whether the projection agrees with the comments' owning references.
    pub fn comments_consistent(&self) -> bool {
        self.comments
            .iter()
            .all(|comment| comment.article_id == Some(self.id))
    }
}

impl CommentRecord {
    pub fn belongs_to(&self, article_id: ArticleId) -> bool {
        self.article_id == Some(article_id)
    }
}
