//! In-process article and comment store.
//!
//! Stands in for a relational backend: ids come from per-table sequences,
//! comments reference their article by id, and an article's comment list is
//! assembled on read from those references.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::repos::{
    ArticlesRepo, ArticlesWriteRepo, CommentsRepo, CommentsWriteRepo, CreateArticleParams,
    CreateCommentParams, RepoError, UpdateArticleParams, UpdateCommentParams,
};
use crate::domain::entities::{ArticleRecord, CommentRecord};
use crate::domain::types::{ArticleId, CommentId};

#[derive(Debug, Clone)]
struct ArticleRow {
    title: String,
    content: String,
}

#[derive(Debug)]
struct Tables {
    next_article_id: i64,
    next_comment_id: i64,
    articles: BTreeMap<ArticleId, ArticleRow>,
    comments: BTreeMap<CommentId, CommentRecord>,
}

impl Tables {
    fn project(&self, id: ArticleId, row: &ArticleRow) -> ArticleRecord {
        ArticleRecord {
            id,
            title: row.title.clone(),
            content: row.content.clone(),
            comments: self.comments_of(id),
        }
    }

    fn comments_of(&self, id: ArticleId) -> Vec<CommentRecord> {
        self.comments
            .values()
            .filter(|comment| comment.belongs_to(id))
            .cloned()
            .collect()
    }

    fn insert_article(&mut self, params: CreateArticleParams) -> ArticleRecord {
        let id = ArticleId(self.next_article_id);
        self.next_article_id += 1;
        let row = ArticleRow {
            title: params.title,
            content: params.content,
        };
        let record = self.project(id, &row);
        self.articles.insert(id, row);
        record
    }
}

#[derive(Debug)]
pub struct InMemoryRepositories {
    tables: RwLock<Tables>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::with_sequences(1, 1)
    }

    /// Start the article and comment sequences at the given ids.
    pub fn with_sequences(first_article_id: i64, first_comment_id: i64) -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_article_id: first_article_id,
                next_comment_id: first_comment_id,
                articles: BTreeMap::new(),
                comments: BTreeMap::new(),
            }),
        }
    }

    pub async fn article_count(&self) -> usize {
        self.tables.read().await.articles.len()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }
}

impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticlesRepo for InMemoryRepositories {
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<ArticleRecord>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.articles.get(&id).map(|row| tables.project(id, row)))
    }

    async fn list_all(&self) -> Result<Vec<ArticleRecord>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .articles
            .iter()
            .map(|(id, row)| tables.project(*id, row))
            .collect())
    }
}

#[async_trait]
impl ArticlesWriteRepo for InMemoryRepositories {
    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.insert_article(params))
    }

    async fn create_articles(
        &self,
        params: Vec<CreateArticleParams>,
    ) -> Result<Vec<ArticleRecord>, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(params
            .into_iter()
            .map(|params| tables.insert_article(params))
            .collect())
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .articles
            .get_mut(&params.id)
            .ok_or(RepoError::NotFound)?;
        row.title = params.title;
        row.content = params.content;
        let row = row.clone();
        Ok(tables.project(params.id, &row))
    }

    async fn delete_article(&self, id: ArticleId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.articles.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|_, comment| !comment.belongs_to(id));
        Ok(())
    }
}

#[async_trait]
impl CommentsRepo for InMemoryRepositories {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<CommentRecord>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<CommentRecord>, RepoError> {
        Ok(self.tables.read().await.comments.values().cloned().collect())
    }

    async fn list_for_article(
        &self,
        article_id: ArticleId,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        Ok(self.tables.read().await.comments_of(article_id))
    }

    async fn search(
        &self,
        article_id: ArticleId,
        author_fragment: &str,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        let needle = author_fragment.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.belongs_to(article_id))
            .filter(|comment| comment.author.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentsWriteRepo for InMemoryRepositories {
    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(article_id) = params.article_id
            && !tables.articles.contains_key(&article_id)
        {
            return Err(RepoError::invalid_input(format!(
                "article {article_id} does not exist"
            )));
        }

        let id = CommentId(tables.next_comment_id);
        tables.next_comment_id += 1;
        let comment = CommentRecord {
            id,
            author: params.author,
            text: params.text,
            article_id: params.article_id,
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        params: UpdateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .get_mut(&params.id)
            .ok_or(RepoError::NotFound)?;
        comment.author = params.author;
        comment.text = params.text;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}
