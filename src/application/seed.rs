//! Seeding articles and their comments from a TOML archive.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    application::{
        articles::ArticleService, comments::CommentDraft, error::AppError,
        repos::CreateArticleParams,
    },
    infra::error::InfraError,
};

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedArchive {
    #[serde(default)]
    pub articles: Vec<SeedArticle>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedArticle {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<SeedComment>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedComment {
    pub author: String,
    pub text: String,
}

/// Counts of what an import created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub articles: usize,
    pub comments: usize,
}

impl SeedArchive {
    pub fn parse(data: &str) -> Result<Self, AppError> {
        toml::from_str(data)
            .map_err(|err| AppError::validation(format!("invalid seed archive: {err}")))
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| AppError::from(InfraError::Io(err)))?;
        Self::parse(&data)
    }

    pub fn encode(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self)
            .map_err(|err| AppError::unexpected(format!("failed to encode seed archive: {err}")))
    }
}

/// Create every archived article in one batch, then attach its comments.
///
/// An archive without articles imports nothing and is not an error.
pub async fn import_seed(
    articles: &ArticleService,
    archive: SeedArchive,
) -> Result<SeedSummary, AppError> {
    if archive.articles.is_empty() {
        return Ok(SeedSummary::default());
    }

    let params = archive
        .articles
        .iter()
        .map(|article| CreateArticleParams {
            title: article.title.clone(),
            content: article.content.clone(),
        })
        .collect();
    let created = articles.create_many(params).await?;

    let mut summary = SeedSummary {
        articles: created.len(),
        comments: 0,
    };
    for (record, seeded) in created.iter().zip(archive.articles) {
        for comment in seeded.comments {
            let draft = CommentDraft {
                author: comment.author,
                text: comment.text,
            };
            if articles.add_comment(record.id, draft).await?.is_some() {
                summary.comments += 1;
            }
        }
    }

    info!(
        articles = summary.articles,
        comments = summary.comments,
        "Seed archive imported"
    );
    Ok(summary)
}
