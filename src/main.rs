use std::path::PathBuf;

use clap::Parser;

use collector::cli::{Cli, Commands};
use collector::config::{default_sources, Config};
use collector::errors::{CollectorError, CollectorResult};
use collector::llm::{AnthropicClient, OpenAiSpeech};
use collector::logging;
use collector::services::{
    CronEntry, FeedGenerator, FetchService, LlmSummarizer, NotionSink, Pipeline, PodcastService,
    RunReport, Scheduler, SystemCrontab,
};
use collector::sources::SourceRegistry;
use collector::storage::open_seen_store;

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %e, "Aborting");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> CollectorResult<()> {
    let cli = Cli::parse();

    // Load configuration; logging starts either way so startup errors reach the log file
    let config = Config::from_env();
    let log_path = match &config {
        Ok(config) => config.log_path.clone(),
        Err(_) => Config::default_log_path(),
    };
    logging::init(&log_path);
    let config = config?;

    match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => cmd_run(&config, dry_run),
        Commands::Schedule { cron, remove } => cmd_schedule(&config, &cron, remove),
        Commands::PodcastFeed => cmd_podcast_feed(&config),
    }
}

fn cmd_run(config: &Config, dry_run: bool) -> CollectorResult<()> {
    tracing::info!(dry_run, "=== AI News Collector start ===");

    let mut store = open_seen_store(&config.state_path)?;
    let seen = store.len()?;
    tracing::info!(path = %config.state_path.display(), seen, "Loaded seen-ID store");

    let sources = default_sources();
    let fetcher = FetchService::new(SourceRegistry::new(), config.recent_hours);
    let llm = AnthropicClient::new(&config.anthropic_api_url, &config.anthropic_api_key, &config.model)?;
    let summarizer = LlmSummarizer::new(llm, &config.summary_language);
    let sink = NotionSink::new(config)?;
    let pipeline = Pipeline::new(fetcher, summarizer, sink);

    if dry_run {
        let pending = pipeline.preview(&sources, store.as_ref());
        for article in &pending {
            println!("  [DRY RUN] [{}] {}", article.source, article.title);
            println!("            {}", article.url);
        }
        println!("Dry run complete. Would process {} articles.", pending.len());
        return Ok(());
    }

    let report = pipeline.run(&sources, store.as_mut());
    print_report(&report);

    if report.processed.is_empty() {
        tracing::info!("No new articles, skipping podcast");
    } else if let Some(openai_key) = &config.openai_api_key {
        tracing::info!("=== Generating podcast ===");
        let speech = OpenAiSpeech::new(&config.openai_api_url, openai_key)?;
        let podcast = PodcastService::new(
            pipeline.summarizer().client(),
            &speech,
            pipeline.sink(),
            &config.notion_database_id,
            &config.summary_language,
            config.podcast.clone(),
            config.utc_offset,
        );
        // A failed digest never fails the run
        if let Err(e) = podcast.publish(&report.processed) {
            tracing::error!(error = %e, "Podcast generation failed");
        }
    } else {
        tracing::info!("OPENAI_API_KEY not set, skipping podcast generation");
    }

    tracing::info!("=== AI News Collector done ===");
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "Processed {} articles ({} fetched, {} already seen, {} failures).",
        report.processed.len(),
        report.fetched,
        report.skipped_seen,
        report.failures()
    );
    for processed in &report.processed {
        println!(
            "  [{}] {} ({})",
            processed.article.source,
            processed.article.title,
            processed.summary.importance.level
        );
    }
}

fn cmd_schedule(config: &Config, cron: &str, remove: bool) -> CollectorResult<()> {
    let executable = std::env::current_exe()?;
    let work_dir = executable
        .parent()
        .map(PathBuf::from)
        .ok_or_else(|| CollectorError::Schedule("executable has no parent directory".to_string()))?;

    let entry = CronEntry::new(cron, &work_dir, &executable, &config.log_path);
    let scheduler = Scheduler::new(SystemCrontab);

    if remove {
        let removed = scheduler.remove(&entry.marker())?;
        println!("Removed {} cron entries.", removed);
    } else {
        scheduler.install(&entry)?;
        println!("Installed cron entry:\n  {}", entry.line());
    }

    Ok(())
}

fn cmd_podcast_feed(config: &Config) -> CollectorResult<()> {
    let generator = FeedGenerator::new(config.podcast.clone(), config.utc_offset);
    let episodes = generator.write()?;

    println!(
        "Wrote {} with {} episodes.",
        generator.feed_path().display(),
        episodes
    );
    Ok(())
}
