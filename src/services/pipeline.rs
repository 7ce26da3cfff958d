use std::collections::HashSet;

use crate::config::SourceConfig;
use crate::domain::{Article, Summary};
use crate::services::sink_service::Sink;
use crate::services::summarizer::Summarizer;
use crate::sources::ArticleFetcher;
use crate::storage::SeenStore;

#[derive(Debug, Clone)]
pub struct ProcessedArticle {
    pub article: Article,
    pub summary: Summary,
}

/// Outcome of one pass over every source
#[derive(Debug, Default)]
pub struct RunReport {
    pub fetched: usize,
    pub skipped_seen: usize,
    pub failed_sources: usize,
    pub failed_summaries: usize,
    pub failed_writes: usize,
    pub failed_store: usize,
    pub processed: Vec<ProcessedArticle>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.failed_sources + self.failed_summaries + self.failed_writes + self.failed_store
    }
}

/// fetch -> dedupe -> summarize -> write -> record, one article at a time
pub struct Pipeline<F: ArticleFetcher, S: Summarizer, W: Sink> {
    fetcher: F,
    summarizer: S,
    sink: W,
}

impl<F: ArticleFetcher, S: Summarizer, W: Sink> Pipeline<F, S, W> {
    pub fn new(fetcher: F, summarizer: S, sink: W) -> Self {
        Self {
            fetcher,
            summarizer,
            sink,
        }
    }

    pub fn summarizer(&self) -> &S {
        &self.summarizer
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Articles from `articles` that still need processing, capped per source
    fn unseen(
        source: &SourceConfig,
        articles: Vec<Article>,
        store: &dyn SeenStore,
        attempted: &HashSet<String>,
        report: &mut RunReport,
    ) -> Vec<Article> {
        let mut fresh = Vec::new();

        for article in articles {
            if attempted.contains(&article.id) || fresh.iter().any(|a: &Article| a.id == article.id) {
                continue;
            }
            match store.contains(&article.id) {
                Ok(true) => report.skipped_seen += 1,
                Ok(false) => fresh.push(article),
                Err(e) => {
                    tracing::error!(
                        source = %source.name,
                        article_id = %article.id,
                        error = %e,
                        "Seen-store lookup failed, skipping article"
                    );
                    report.failed_store += 1;
                }
            }
        }

        if let Some(max) = source.max_new_articles {
            fresh.truncate(max);
        }
        fresh
    }

    /// Process every source; failures are logged and counted, never returned
    pub fn run(&self, sources: &[SourceConfig], store: &mut dyn SeenStore) -> RunReport {
        let mut report = RunReport::default();
        let mut attempted = HashSet::new();

        for source in sources {
            let articles = match self.fetcher.fetch(source) {
                Ok(articles) => articles,
                Err(e) => {
                    tracing::error!(source = %source.name, error = %e, "Feed fetch failed");
                    report.failed_sources += 1;
                    continue;
                }
            };
            report.fetched += articles.len();

            let fresh = Self::unseen(source, articles, &*store, &attempted, &mut report);
            tracing::info!(source = %source.name, new = fresh.len(), "New articles");

            for article in fresh {
                attempted.insert(article.id.clone());
                if let Some(processed) = self.process(article, store, &mut report) {
                    report.processed.push(processed);
                }
            }
        }

        if let Err(e) = store.save() {
            tracing::error!(error = %e, "Failed to save seen-ID store");
            report.failed_store += 1;
        }

        tracing::info!(
            processed = report.processed.len(),
            skipped_seen = report.skipped_seen,
            failures = report.failures(),
            "Run finished"
        );

        report
    }

    fn process(
        &self,
        article: Article,
        store: &mut dyn SeenStore,
        report: &mut RunReport,
    ) -> Option<ProcessedArticle> {
        tracing::info!(
            source = %article.source,
            article_id = %article.id,
            title = %article.short_title(),
            "Summarizing"
        );

        let summary = match self.summarizer.summarize(&article) {
            Ok(summary) => summary,
            Err(e) => {
                // Left unseen so the next run retries it
                tracing::error!(
                    source = %article.source,
                    article_id = %article.id,
                    url = %article.url,
                    error = %e,
                    "Summarization failed"
                );
                report.failed_summaries += 1;
                return None;
            }
        };

        if let Err(e) = self.sink.write(&article, &summary) {
            tracing::error!(
                source = %article.source,
                article_id = %article.id,
                url = %article.url,
                error = %e,
                "Sink write failed"
            );
            report.failed_writes += 1;
            return None;
        }
        tracing::info!(article_id = %article.id, title = %article.short_title(), "Page created");

        // The page exists now; a failure here only means a duplicate page next run
        if let Err(e) = store.add(&article.id).and_then(|_| store.save()) {
            tracing::error!(
                article_id = %article.id,
                error = %e,
                "Failed to record article as seen"
            );
            report.failed_store += 1;
        }

        Some(ProcessedArticle { article, summary })
    }

    /// Dry run: what `run` would process, with no API calls and no state changes
    pub fn preview(&self, sources: &[SourceConfig], store: &dyn SeenStore) -> Vec<Article> {
        let mut report = RunReport::default();
        let attempted = HashSet::new();
        let mut pending = Vec::new();

        for source in sources {
            match self.fetcher.fetch(source) {
                Ok(articles) => {
                    pending.extend(Self::unseen(source, articles, store, &attempted, &mut report));
                }
                Err(e) => {
                    tracing::error!(source = %source.name, error = %e, "Feed fetch failed");
                }
            }
        }

        pending
    }
}
