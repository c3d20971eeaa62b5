//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{ArticleRecord, CommentRecord};
use crate::domain::types::{ArticleId, CommentId};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateArticleParams {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct UpdateArticleParams {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
}

impl From<&ArticleRecord> for UpdateArticleParams {
    fn from(article: &ArticleRecord) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            content: article.content.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub article_id: Option<ArticleId>,
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCommentParams {
    pub id: CommentId,
    pub author: String,
    pub text: String,
}

impl From<&CommentRecord> for UpdateCommentParams {
    fn from(comment: &CommentRecord) -> Self {
        Self {
            id: comment.id,
            author: comment.author.clone(),
            text: comment.text.clone(),
        }
    }
}

#[async_trait]
pub trait ArticlesRepo: Send + Sync {
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<ArticleRecord>, RepoError>;

    async fn list_all(&self) -> Result<Vec<ArticleRecord>, RepoError>;
}

#[async_trait]
pub trait ArticlesWriteRepo: Send + Sync {
    async fn create_article(&self, params: CreateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    async fn create_articles(
        &self,
        params: Vec<CreateArticleParams>,
    ) -> Result<Vec<ArticleRecord>, RepoError>;

    async fn update_article(&self, params: UpdateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    /// Delete the article together with every comment it owns.
    async fn delete_article(&self, id: ArticleId) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<CommentRecord>, RepoError>;

    async fn list_all(&self) -> Result<Vec<CommentRecord>, RepoError>;

    async fn list_for_article(&self, article_id: ArticleId)
    -> Result<Vec<CommentRecord>, RepoError>;

    /// Comments of `article_id` whose author contains `author_fragment`,
    /// compared case-insensitively. An empty fragment matches every author.
    async fn search(
        &self,
        article_id: ArticleId,
        author_fragment: &str,
    ) -> Result<Vec<CommentRecord>, RepoError>;
}

#[async_trait]
pub trait CommentsWriteRepo: Send + Sync {
    async fn create_comment(&self, params: CreateCommentParams)
    -> Result<CommentRecord, RepoError>;

    async fn update_comment(&self, params: UpdateCommentParams)
    -> Result<CommentRecord, RepoError>;

    async fn delete_comment(&self, id: CommentId) -> Result<(), RepoError>;
}
