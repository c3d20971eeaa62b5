//! Cache-aside orchestration for comments.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::counter::RequestCounter;
use crate::application::error::ContentError;
use crate::application::repos::{
    CommentsRepo, CommentsWriteRepo, CreateCommentParams, UpdateCommentParams,
};
use crate::cache::stats::record_lookup;
use crate::cache::{ArticleIndex, CommentIndex, NormalizedKey};
use crate::domain::entities::CommentRecord;
use crate::domain::types::{ArticleId, CommentId};

const AUTHOR_LOOKUP: &str = "comments_by_author";

/// Author and text of a comment, used for new comments and for updates.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub author: String,
    pub text: String,
}

/// Comment reads and writes through the [`CommentIndex`].
///
/// A cached article carries its comments as a projection, so any comment
/// write also drops the owning article from the [`ArticleIndex`]; the next
/// read rebuilds it from the store.
#[derive(Clone)]
pub struct CommentService {
    reader: Arc<dyn CommentsRepo>,
    writer: Arc<dyn CommentsWriteRepo>,
    comments: Arc<CommentIndex>,
    articles: Arc<ArticleIndex>,
    requests: Arc<RequestCounter>,
}

impl CommentService {
    pub fn new(
        reader: Arc<dyn CommentsRepo>,
        writer: Arc<dyn CommentsWriteRepo>,
        comments: Arc<CommentIndex>,
        articles: Arc<ArticleIndex>,
        requests: Arc<RequestCounter>,
    ) -> Self {
        Self {
            reader,
            writer,
            comments,
            articles,
            requests,
        }
    }

    pub async fn create(&self, params: CreateCommentParams) -> Result<CommentRecord, ContentError> {
        self.requests.increment();
        let comment = self.writer.create_comment(params).await?;
        self.comments.replace(comment.clone());
        self.evict_owner(&comment);
        info!(comment_id = %comment.id, "Comment created");
        Ok(comment)
    }

    pub async fn find_by_id(&self, id: CommentId) -> Result<Option<CommentRecord>, ContentError> {
        self.requests.increment();
        if let Some(comment) = self.comments.get(id) {
            debug!(comment_id = %id, path = "cache", "Comment lookup");
            return Ok(Some(comment));
        }

        let found = self.reader.find_by_id(id).await?;
        if let Some(comment) = &found {
            self.comments.replace(comment.clone());
        }
        debug!(comment_id = %id, path = "store", found = found.is_some(), "Comment lookup");
        Ok(found)
    }

    pub async fn list_all(&self) -> Result<Vec<CommentRecord>, ContentError> {
        self.requests.increment();
        let comments = self.reader.list_all().await?;
        for comment in &comments {
            self.comments.replace(comment.clone());
        }
        debug!(count = comments.len(), "Comments listed");
        Ok(comments)
    }

    pub async fn update(
        &self,
        id: CommentId,
        draft: CommentDraft,
    ) -> Result<Option<CommentRecord>, ContentError> {
        self.requests.increment();
        let Some(mut comment) = self.reader.find_by_id(id).await? else {
            return Ok(None);
        };

        comment.author = draft.author;
        comment.text = draft.text;
        let updated = self
            .writer
            .update_comment(UpdateCommentParams::from(&comment))
            .await?;
        self.comments.replace(updated.clone());
        self.evict_owner(&updated);
        info!(comment_id = %id, "Comment updated");
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: CommentId) -> Result<bool, ContentError> {
        self.requests.increment();
        let Some(comment) = self.reader.find_by_id(id).await? else {
            return Ok(false);
        };

        self.writer.delete_comment(id).await?;
        self.comments.remove(id);
        self.evict_owner(&comment);
        info!(comment_id = %id, "Comment deleted");
        Ok(true)
    }

    /// Comments on `article_id` whose author contains `author_filter`,
    /// case-insensitively. An empty filter matches every author.
    ///
    /// The cached author list is only served when it is non-empty and every
    /// entry belongs to `article_id`; anything else goes to the store and
    /// repopulates the index with the result.
    pub async fn search(
        &self,
        article_id: ArticleId,
        author_filter: &str,
    ) -> Result<Vec<CommentRecord>, ContentError> {
        self.requests.increment();
        let cached = self.comments.comments_by_author(author_filter);
        if !cached.is_empty() && cached.iter().all(|comment| comment.belongs_to(article_id)) {
            record_lookup(AUTHOR_LOOKUP, true);
            debug!(article_id = %article_id, author_filter, path = "cache", "Comment search");
            return Ok(cached);
        }

        record_lookup(AUTHOR_LOOKUP, false);
        let fragment = NormalizedKey::new(author_filter);
        let found = self.reader.search(article_id, fragment.as_str()).await?;
        for comment in &found {
            self.comments.replace(comment.clone());
        }
        debug!(
            article_id = %article_id,
            author_filter,
            path = "store",
            count = found.len(),
            "Comment search"
        );
        Ok(found)
    }

    fn evict_owner(&self, comment: &CommentRecord) {
        if let Some(article_id) = comment.article_id {
            self.articles.remove(article_id);
        }
    }
}
