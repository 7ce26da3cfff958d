pub mod fetch_service;
pub mod summarizer;
pub mod sink_service;
pub mod pipeline;
pub mod podcast_service;
pub mod feed_generator;
pub mod scheduler;

pub use fetch_service::FetchService;
pub use summarizer::{LlmSummarizer, Summarizer};
pub use sink_service::{NotionSink, PageWriter, Sink};
pub use pipeline::{Pipeline, ProcessedArticle, RunReport};
pub use podcast_service::PodcastService;
pub use feed_generator::FeedGenerator;
pub use scheduler::{CronEntry, Crontab, Scheduler, SystemCrontab};
