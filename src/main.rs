use std::{path::Path, process, sync::Arc};

use lectern::{
    application::{
        articles::{ArticleDraft, ArticleService},
        comments::{CommentDraft, CommentService},
        counter::RequestCounter,
        error::AppError,
        repos::CreateArticleParams,
        seed::{self, SeedArchive, SeedArticle, SeedComment},
    },
    cache::{ArticleIndex, CacheConfig, CommentIndex},
    config,
    infra::{memory::InMemoryRepositories, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

const FIRST_ARTICLE_ID: i64 = 1;
const FIRST_COMMENT_ID: i64 = 10;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?error.chain(), "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?error.chain(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Walkthrough(config::WalkthroughArgs::default()));

    match command {
        config::Command::Walkthrough(args) => {
            telemetry::init(&settings.logging).map_err(AppError::from)?;
            run_walkthrough(&settings, args).await
        }
        config::Command::SampleSeed(args) => print_sample_seed(args),
    }
}

struct ApplicationContext {
    articles: ArticleService,
    comments: CommentService,
    requests: Arc<RequestCounter>,
}

fn build_application_context(settings: &config::Settings) -> ApplicationContext {
    let cache_config = CacheConfig::from(&settings.cache);
    let store = Arc::new(InMemoryRepositories::with_sequences(
        FIRST_ARTICLE_ID,
        FIRST_COMMENT_ID,
    ));
    let article_index = Arc::new(ArticleIndex::new(&cache_config));
    let comment_index = Arc::new(CommentIndex::new(&cache_config));
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
        store,
        comment_index,
        article_index,
        requests.clone(),
    );

    info!(
        article_cache = cache_config.enable_article_cache,
        comment_cache = cache_config.enable_comment_cache,
        "Application context ready"
    );
    if !cache_config.is_enabled() {
        warn!("Both indexes are disabled; every read goes to the store");
    }

    ApplicationContext {
        articles,
        comments,
        requests,
    }
}

async fn run_walkthrough(
    settings: &config::Settings,
    args: config::WalkthroughArgs,
) -> Result<(), AppError> {
    let app = build_application_context(settings);

    if let Some(path) = args.seed.as_deref() {
        seed_from(&app, path).await?;
    }

    let article = app
        .articles
        .create(CreateArticleParams {
            title: "Go".to_string(),
            content: "lang".to_string(),
        })
        .await?;
    let fetched = app
        .articles
        .find_by_id(article.id)
        .await?
        .ok_or_else(|| AppError::unexpected("created article is missing"))?;
    info!(article_id = %fetched.id, title = %fetched.title, "Fetched article");

    let comment = app
        .articles
        .add_comment(
            article.id,
            CommentDraft {
                author: "Ann".to_string(),
                text: "hi".to_string(),
            },
        )
        .await?
        .ok_or_else(|| AppError::unexpected("article vanished before comment was added"))?;

    let found = app.comments.search(article.id, "ann").await?;
    info!(
        article_id = %article.id,
        comment_id = %comment.id,
        matches = found.len(),
        "Searched comments by author"
    );

    app.articles
        .update(
            article.id,
            ArticleDraft {
                title: "Go, revisited".to_string(),
                content: fetched.content,
            },
        )
        .await?;

    app.articles.delete(article.id).await?;
    let after_delete = app.comments.search(article.id, "ann").await?;
    info!(
        article_id = %article.id,
        matches = after_delete.len(),
        "Searched comments after delete"
    );

    let remaining = app.articles.list_all().await?;
    info!(
        articles = remaining.len(),
        requests = app.requests.get(),
        "Walkthrough finished"
    );
    Ok(())
}

async fn seed_from(app: &ApplicationContext, path: &Path) -> Result<(), AppError> {
    let archive = SeedArchive::load(path).await?;
    let summary = seed::import_seed(&app.articles, archive).await?;
    info!(
        path = %path.display(),
        articles = summary.articles,
        comments = summary.comments,
        "Seeded store"
    );
    Ok(())
}

fn print_sample_seed(args: config::SampleSeedArgs) -> Result<(), AppError> {
    let archive = SeedArchive {
        articles: (1..=args.articles)
            .map(|n| SeedArticle {
                title: format!("Article {n}"),
                content: format!("Body of article {n}."),
                comments: vec![SeedComment {
                    author: "Ann".to_string(),
                    text: format!("First on article {n}"),
                }],
            })
            .collect(),
    };
    print!("{}", archive.encode()?);
    Ok(())
}
