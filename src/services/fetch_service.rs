use chrono::{DateTime, Utc};

use crate::config::SourceConfig;
use crate::domain::Article;
use crate::errors::CollectorResult;
use crate::sources::{ArticleFetcher, SourceRegistry};

/// Fetches a source and keeps only recent, on-topic articles
pub struct FetchService {
    source_registry: SourceRegistry,
    recent_hours: i64,
}

impl FetchService {
    pub fn new(source_registry: SourceRegistry, recent_hours: i64) -> Self {
        Self {
            source_registry,
            recent_hours,
        }
    }

    /// Apply the keyword and recency filters
    pub fn filter_articles(
        source: &SourceConfig,
        articles: Vec<Article>,
        now: DateTime<Utc>,
        recent_hours: i64,
    ) -> Vec<Article> {
        articles
            .into_iter()
            .filter(|a| a.is_recent(now, recent_hours))
            .filter(|a| source.matches_keywords(&a.filter_text()))
            .collect()
    }
}

impl ArticleFetcher for FetchService {
    fn fetch(&self, source: &SourceConfig) -> CollectorResult<Vec<Article>> {
        tracing::info!(source = %source.name, url = %source.url(), "Fetching");

        let articles = self.source_registry.fetch_articles(source)?;
        let total = articles.len();
        let kept = Self::filter_articles(source, articles, Utc::now(), self.recent_hours);

        tracing::info!(
            source = %source.name,
            total,
            kept = kept.len(),
            "Fetched candidate articles"
        );

        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn source() -> SourceConfig {
        SourceConfig::feed("Salesforce Blog", "Salesforce", "https://www.salesforce.com/blog/feed/")
            .with_keywords(&["Agentforce", "LLM"])
    }

    fn article(title: &str, url: &str) -> Article {
        Article::new(&source(), title.to_string(), url.to_string())
    }

    #[test]
    fn test_keyword_filter_checks_title_and_content() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let articles = vec![
            article("Agentforce 2.0 is here", "https://s.com/1"),
            article("Trailblazer awards", "https://s.com/2"),
            article("Customer stories", "https://s.com/3")
                .with_content(Some("How one bank used an LLM for triage".to_string())),
        ];

        let kept = FetchService::filter_articles(&source(), articles, now, 72);
        let urls: Vec<&str> = kept.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://s.com/1", "https://s.com/3"]);
    }

    #[test]
    fn test_category_satisfies_keyword_filter() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let articles = vec![article("Spring release", "https://s.com/4")
            .with_categories(vec!["Agentforce".to_string()])];

        let kept = FetchService::filter_articles(&source(), articles, now, 72);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_stale_articles_dropped() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let articles = vec![
            article("Agentforce old news", "https://s.com/old")
                .with_published(Some(now - Duration::days(10))),
            article("Agentforce new news", "https://s.com/new")
                .with_published(Some(now - Duration::hours(1))),
        ];

        let kept = FetchService::filter_articles(&source(), articles, now, 72);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "https://s.com/new");
    }
}
