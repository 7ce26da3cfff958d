use clap::{Parser, Subcommand};

use crate::services::scheduler::DEFAULT_CRON;

#[derive(Parser)]
#[command(name = "collector")]
#[command(about = "Daily AI news collector: feeds in, LLM summaries out to Notion")]
#[command(version)]
pub struct Cli {
    /// Runs the pipeline when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all sources, summarize new articles and write them to Notion
    Run {
        /// Dry run - list the articles that would be processed without calling any API
        #[arg(long)]
        dry_run: bool,
    },

    /// Register (or remove) the daily cron entry for this executable
    Schedule {
        /// Cron expression for the run
        #[arg(long, default_value = DEFAULT_CRON)]
        cron: String,

        /// Remove the entry instead of installing it
        #[arg(long)]
        remove: bool,
    },

    /// Rebuild the podcast RSS feed from the MP3 files on disk
    PodcastFeed,
}
