use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Lectern binary.
#[derive(Debug, Parser)]
#[command(
    name = "lectern",
    version,
    about = "Cache-aside article and comment backend"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "LECTERN_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Seed the store and walk through the cached operations.
    Walkthrough(WalkthroughArgs),
    /// Print a sample seed archive to stdout.
    #[command(name = "sample-seed")]
    SampleSeed(SampleSeedArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct WalkthroughArgs {
    #[command(flatten)]
    pub overrides: RuntimeOverrides,

    /// TOML archive of articles and comments imported before the walkthrough.
    #[arg(long = "seed", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub seed: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SampleSeedArgs {
    /// Number of sample articles to include.
    #[arg(long = "articles", value_name = "COUNT", default_value_t = 2)]
    pub articles: usize,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RuntimeOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Enable or disable the article index.
    #[arg(
        long = "article-cache",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub article_cache: Option<bool>,

    /// Enable or disable the comment index.
    #[arg(
        long = "comment-cache",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub comment_cache: Option<bool>,
}
