//! Cache-aside orchestration for articles.
//!
//! Reads consult the [`ArticleIndex`] first and fall back to the store,
//! repopulating on the way out. Writes go to the store first and only touch
//! the indexes once the store has accepted them. Deleting an article also
//! invalidates every cached comment it owned.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::comments::CommentDraft;
use crate::application::counter::RequestCounter;
use crate::application::error::ContentError;
use crate::application::repos::{
    ArticlesRepo, ArticlesWriteRepo, CommentsRepo, CommentsWriteRepo, CreateArticleParams,
    CreateCommentParams, UpdateArticleParams,
};
use crate::cache::stats::record_lookup;
use crate::cache::{ArticleIndex, CommentIndex};
use crate::domain::entities::{ArticleRecord, CommentRecord};
use crate::domain::types::ArticleId;

const ARTICLE_COMMENTS_LOOKUP: &str = "comments_by_article";

/// Replacement values for an article's mutable fields.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
}

#[derive(Clone)]
pub struct ArticleService {
    reader: Arc<dyn ArticlesRepo>,
    writer: Arc<dyn ArticlesWriteRepo>,
    comment_reader: Arc<dyn CommentsRepo>,
    comment_writer: Arc<dyn CommentsWriteRepo>,
    articles: Arc<ArticleIndex>,
    comments: Arc<CommentIndex>,
    requests: Arc<RequestCounter>,
}

impl ArticleService {
    pub fn new(
        reader: Arc<dyn ArticlesRepo>,
        writer: Arc<dyn ArticlesWriteRepo>,
        comment_reader: Arc<dyn CommentsRepo>,
        comment_writer: Arc<dyn CommentsWriteRepo>,
        articles: Arc<ArticleIndex>,
        comments: Arc<CommentIndex>,
        requests: Arc<RequestCounter>,
    ) -> Self {
        Self {
            reader,
            writer,
            comment_reader,
            comment_writer,
            articles,
            comments,
            requests,
        }
    }

    pub async fn create(&self, params: CreateArticleParams) -> Result<ArticleRecord, ContentError> {
        self.requests.increment();
        let article = self.writer.create_article(params).await?;
        self.articles.put(article.clone());
        info!(article_id = %article.id, "Article created");
        Ok(article)
    }

    /// Create a batch of articles. An empty batch is rejected before the
    /// store is contacted.
    pub async fn create_many(
        &self,
        params: Vec<CreateArticleParams>,
    ) -> Result<Vec<ArticleRecord>, ContentError> {
        self.requests.increment();
        if params.is_empty() {
            return Err(ContentError::InvalidArgument(
                "article batch must not be empty",
            ));
        }

        let articles = self.writer.create_articles(params).await?;
        for article in &articles {
            self.articles.put(article.clone());
        }
        info!(count = articles.len(), "Articles created");
        Ok(articles)
    }

    pub async fn find_by_id(&self, id: ArticleId) -> Result<Option<ArticleRecord>, ContentError> {
        self.requests.increment();
        if let Some(article) = self.articles.get(id) {
            debug!(article_id = %id, path = "cache", "Article lookup");
            return Ok(Some(article));
        }

        let found = self.reader.find_by_id(id).await?;
        if let Some(article) = &found {
            self.articles.put(article.clone());
        }
        debug!(article_id = %id, path = "store", found = found.is_some(), "Article lookup");
        Ok(found)
    }

    /// Every stored article. Each one is written back into the index; cached
    /// articles missing from the result are left alone.
    pub async fn list_all(&self) -> Result<Vec<ArticleRecord>, ContentError> {
        self.requests.increment();
        let articles = self.reader.list_all().await?;
        for article in &articles {
            self.articles.put(article.clone());
        }
        debug!(count = articles.len(), "Articles listed");
        Ok(articles)
    }

    pub async fn update(
        &self,
        id: ArticleId,
        draft: ArticleDraft,
    ) -> Result<Option<ArticleRecord>, ContentError> {
        self.requests.increment();
        let Some(mut article) = self.reader.find_by_id(id).await? else {
            return Ok(None);
        };

        article.title = draft.title;
        article.content = draft.content;
        let updated = self
            .writer
            .update_article(UpdateArticleParams::from(&article))
            .await?;
        self.articles.put(updated.clone());
        info!(article_id = %id, "Article updated");
        Ok(Some(updated))
    }

    /// Delete the article and invalidate the comments it owned.
    ///
    /// Owned comments come from the comment index when it lists any for this
    /// article, otherwise from the store. Both indexes are only touched after
    /// the store delete succeeds.
    pub async fn delete(&self, id: ArticleId) -> Result<bool, ContentError> {
        self.requests.increment();
        if self.reader.find_by_id(id).await?.is_none() {
            return Ok(false);
        }

        let owned = self.owned_comments(id).await?;
        self.writer.delete_article(id).await?;

        for comment in &owned {
            self.comments.remove(comment.id);
        }
        self.articles.remove(id);
        info!(article_id = %id, comments = owned.len(), "Article deleted");
        Ok(true)
    }

    /// Attach a new comment to an existing article.
    ///
    /// The cached article is replaced by the store copy with the new comment
    /// appended to its projection.
    pub async fn add_comment(
        &self,
        article_id: ArticleId,
        draft: CommentDraft,
    ) -> Result<Option<CommentRecord>, ContentError> {
        self.requests.increment();
        let Some(mut article) = self.reader.find_by_id(article_id).await? else {
            return Ok(None);
        };

        let comment = self
            .comment_writer
            .create_comment(CreateCommentParams {
                article_id: Some(article.id),
                author: draft.author,
                text: draft.text,
            })
            .await?;
        self.comments.replace(comment.clone());
        article.attach(comment.clone());
        self.articles.put(article);
        info!(article_id = %article_id, comment_id = %comment.id, "Comment added");
        Ok(Some(comment))
    }

    /// Comments owned by the article, served from the comment index when it
    /// lists any.
    ///
    /// Never returns duplicates: every write path here goes through
    /// [`CommentIndex::replace`], unlike a raw [`CommentIndex::put`].
    pub async fn list_comments(
        &self,
        article_id: ArticleId,
    ) -> Result<Vec<CommentRecord>, ContentError> {
        self.requests.increment();
        let cached = self.comments.comments_by_article(article_id);
        if !cached.is_empty() {
            record_lookup(ARTICLE_COMMENTS_LOOKUP, true);
            return Ok(cached);
        }

        record_lookup(ARTICLE_COMMENTS_LOOKUP, false);
        let comments = self.comment_reader.list_for_article(article_id).await?;
        for comment in &comments {
            self.comments.replace(comment.clone());
        }
        Ok(comments)
    }

    // An empty cached list cannot be told apart from one never populated, so
    // it always costs a store query.
    async fn owned_comments(&self, id: ArticleId) -> Result<Vec<CommentRecord>, ContentError> {
        let cached = self.comments.comments_by_article(id);
        if !cached.is_empty() {
            return Ok(cached);
        }
        Ok(self.comment_reader.list_for_article(id).await?)
    }
}
