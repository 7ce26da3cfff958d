use crate::config::SourceConfig;
use crate::domain::Article;
use crate::errors::{CollectorError, CollectorResult};
use crate::sources::traits::FeedSource;
use crate::sources::{rss_atom::RssAtomSource, scrape::ScrapeSource};

pub struct SourceRegistry {
    sources: Vec<Box<dyn FeedSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };

        registry.register(Box::new(RssAtomSource::new()));
        registry.register(Box::new(ScrapeSource::new()));

        registry
    }

    pub fn register(&mut self, source: Box<dyn FeedSource>) {
        self.sources.push(source);
    }

    /// Find the reader for a configured source
    pub fn find_source(&self, source: &SourceConfig) -> Option<&dyn FeedSource> {
        self.sources
            .iter()
            .find(|s| s.can_handle(&source.kind))
            .map(|s| s.as_ref())
    }

    /// Fetch raw articles from a configured source
    pub fn fetch_articles(&self, source: &SourceConfig) -> CollectorResult<Vec<Article>> {
        let reader = self.find_source(source).ok_or_else(|| {
            CollectorError::Config(format!("No reader for source: {}", source.name))
        })?;

        reader.fetch_articles(source)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_sources, SourceKind};

    #[test]
    fn test_every_default_source_has_a_reader() {
        let registry = SourceRegistry::new();

        for source in default_sources() {
            assert!(
                registry.find_source(&source).is_some(),
                "No reader for {}",
                source.name
            );
        }
    }

    #[test]
    fn test_empty_registry_reports_config_error() {
        let registry = SourceRegistry {
            sources: Vec::new(),
        };
        let source = SourceConfig::feed("Blog", "Tag", "https://example.com/feed");

        let err = registry.fetch_articles(&source).unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }

    #[test]
    fn test_scrape_kind_routed_to_scraper() {
        let registry = SourceRegistry::new();
        let source = SourceConfig::scrape("Listing", "Tag", "https://example.com/news/");
        let reader = registry.find_source(&source).unwrap();

        assert!(reader.can_handle(&SourceKind::Scrape {
            url: String::new()
        }));
        assert!(!reader.can_handle(&SourceKind::Feed { url: String::new() }));
    }
}
