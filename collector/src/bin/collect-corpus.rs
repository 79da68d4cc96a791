use clap::{ArgAction, Parser};
use eyre::Context;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_engagement_corpus::config::CollectorConfig;
use youtube_engagement_corpus::corpus::DEFAULT_OUTPUT_PATH;
use youtube_engagement_corpus::pipeline;
use youtube_engagement_corpus::youtube_api::{YouTubeClient, mask_api_key};

/// Collect short- and long-form YouTube videos per category and write them out as CSV.
#[derive(Debug, Parser)]
#[command(name = "collect-corpus", version)]
struct Cli {
    /// JSON file replacing the built-in categories and collection settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Where to write the corpus.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    /// YouTube Data API key.
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: String,
    /// Override the number of videos per category and phase.
    #[arg(long)]
    target_count: Option<usize>,
    /// Override the number of ids requested per short-phase search.
    #[arg(long)]
    short_overfetch: Option<usize>,
    /// Override the API endpoint root.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Increase logging verbosity (-v, -vv).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let mut config = match &cli.config {
        Some(path) => CollectorConfig::from_json_file(path)?,
        None => CollectorConfig::default(),
    };
    if let Some(target_count) = cli.target_count {
        config.target_count = target_count;
    }
    if let Some(short_overfetch) = cli.short_overfetch {
        config.short_overfetch = short_overfetch;
    }
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    config.validate().context("invalid collection settings")?;

    tracing::info!(api_key = %mask_api_key(&cli.api_key), "loaded API key");
    let client = YouTubeClient::new(cli.api_key, &config.api).context("set up YouTube client")?;

    let collection = pipeline::run(&config, &client).await?;
    pipeline::log_summary(&collection);

    collection.corpus.write_csv_path(&cli.output)?;
    tracing::info!(
        path = %cli.output.display(),
        rows = collection.corpus.len(),
        "saved corpus"
    );

    Ok(())
}
