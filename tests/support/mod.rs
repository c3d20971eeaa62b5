//! Repository doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lectern::application::articles::ArticleService;
use lectern::application::comments::CommentService;
use lectern::application::counter::RequestCounter;
use lectern::application::repos::{
    ArticlesRepo, ArticlesWriteRepo, CommentsRepo, CommentsWriteRepo, CreateArticleParams,
    CreateCommentParams, RepoError, UpdateArticleParams, UpdateCommentParams,
};
use lectern::cache::{ArticleIndex, CacheConfig, CommentIndex};
use lectern::domain::entities::{ArticleRecord, CommentRecord};
use lectern::domain::types::{ArticleId, CommentId};
use lectern::infra::memory::InMemoryRepositories;

/// Read counters for the store, split by query.
#[derive(Debug, Default)]
pub struct StoreReads {
    pub article_by_id: AtomicUsize,
    pub articles_all: AtomicUsize,
    pub comment_by_id: AtomicUsize,
    pub comments_all: AtomicUsize,
    pub comments_for_article: AtomicUsize,
    pub comment_search: AtomicUsize,
}

impl StoreReads {
    pub fn total(&self) -> usize {
        [
            &self.article_by_id,
            &self.articles_all,
            &self.comment_by_id,
            &self.comments_all,
            &self.comments_for_article,
            &self.comment_search,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::SeqCst))
        .sum()
    }
}

/// Wraps the in-memory store and counts every read that reaches it.
#[derive(Debug)]
pub struct RecordingRepositories {
    inner: InMemoryRepositories,
    pub reads: StoreReads,
}

impl RecordingRepositories {
    pub fn new(inner: InMemoryRepositories) -> Self {
        Self {
            inner,
            reads: StoreReads::default(),
        }
    }

    pub fn inner(&self) -> &InMemoryRepositories {
        &self.inner
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

#[async_trait]
impl ArticlesRepo for RecordingRepositories {
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<ArticleRecord>, RepoError> {
        bump(&self.reads.article_by_id);
        ArticlesRepo::find_by_id(&self.inner, id).await
    }

    async fn list_all(&self) -> Result<Vec<ArticleRecord>, RepoError> {
        bump(&self.reads.articles_all);
        ArticlesRepo::list_all(&self.inner).await
    }
}

#[async_trait]
impl ArticlesWriteRepo for RecordingRepositories {
    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        self.inner.create_article(params).await
    }

    async fn create_articles(
        &self,
        params: Vec<CreateArticleParams>,
    ) -> Result<Vec<ArticleRecord>, RepoError> {
        self.inner.create_articles(params).await
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        self.inner.update_article(params).await
    }

    async fn delete_article(&self, id: ArticleId) -> Result<(), RepoError> {
        self.inner.delete_article(id).await
    }
}

#[async_trait]
impl CommentsRepo for RecordingRepositories {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<CommentRecord>, RepoError> {
        bump(&self.reads.comment_by_id);
        CommentsRepo::find_by_id(&self.inner, id).await
    }

    async fn list_all(&self) -> Result<Vec<CommentRecord>, RepoError> {
        bump(&self.reads.comments_all);
        CommentsRepo::list_all(&self.inner).await
    }

    async fn list_for_article(
        &self,
        article_id: ArticleId,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        bump(&self.reads.comments_for_article);
        self.inner.list_for_article(article_id).await
    }

    async fn search(
        &self,
        article_id: ArticleId,
        author_fragment: &str,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        bump(&self.reads.comment_search);
        self.inner.search(article_id, author_fragment).await
    }
}

#[async_trait]
impl CommentsWriteRepo for RecordingRepositories {
    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        self.inner.create_comment(params).await
    }

    async fn update_comment(
        &self,
        params: UpdateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        self.inner.update_comment(params).await
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RepoError> {
        self.inner.delete_comment(id).await
    }
}

/// Services wired to one recording store and one pair of indexes.
pub struct Harness {
    pub store: Arc<RecordingRepositories>,
    pub article_index: Arc<ArticleIndex>,
    pub comment_index: Arc<CommentIndex>,
    pub requests: Arc<RequestCounter>,
    pub articles: ArticleService,
    pub comments: CommentService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default(), InMemoryRepositories::new())
    }

    /// Article ids start at 1 and comment ids at 10.
    pub fn with_scenario_sequences() -> Self {
        Self::with_config(
            CacheConfig::default(),
            InMemoryRepositories::with_sequences(1, 10),
        )
    }

    pub fn with_config(config: CacheConfig, store: InMemoryRepositories) -> Self {
        let store = Arc::new(RecordingRepositories::new(store));
        let article_index = Arc::new(ArticleIndex::new(&config));
        let comment_index = Arc::new(CommentIndex::new(&config));
        let requests = Arc::new(RequestCounter::new());

        let articles = ArticleService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            article_index.clone(),
            comment_index.clone(),
            requests.clone(),
        );
        let comments = CommentService::new(
            store.clone(),
            store.clone(),
            comment_index.clone(),
            article_index.clone(),
            requests.clone(),
        );

        Self {
            store,
            article_index,
            comment_index,
            requests,
            articles,
            comments,
        }
    }

    pub fn store_reads(&self) -> usize {
        self.store.reads.total()
    }
}

pub fn article(title: &str, content: &str) -> CreateArticleParams {
    CreateArticleParams {
        title: title.to_string(),
        content: content.to_string(),
    }
}
