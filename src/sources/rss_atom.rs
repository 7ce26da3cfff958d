use feed_rs::parser;
use reqwest::blocking::Client;
use scraper::Html;

use crate::config::{SourceConfig, SourceKind};
use crate::domain::Article;
use crate::errors::{CollectorError, CollectorResult};
use crate::sources::http::build_client;
use crate::sources::traits::FeedSource;

pub struct RssAtomSource {
    client: Client,
}

impl RssAtomSource {
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }

    fn parse_bytes(bytes: &[u8]) -> CollectorResult<feed_rs::model::Feed> {
        parser::parse(bytes).map_err(|e| CollectorError::FeedParse(e.to_string()))
    }

    /// Map parsed entries to articles; entries without a link are dropped
    pub fn articles_from_bytes(source: &SourceConfig, bytes: &[u8]) -> CollectorResult<Vec<Article>> {
        let parsed = Self::parse_bytes(bytes)?;

        let articles = parsed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let url = entry
                    .links
                    .iter()
                    .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"))
                    .or_else(|| entry.links.first())
                    .map(|l| l.href.trim().to_string())
                    .filter(|href| !href.is_empty())?;

                let title = entry
                    .title
                    .map(|t| html_to_text(&t.content))
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "(no title)".to_string());

                let content = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .map(|html| html_to_text(&html))
                    .filter(|text| !text.is_empty());

                let categories = entry
                    .categories
                    .into_iter()
                    .map(|c| c.label.unwrap_or(c.term))
                    .collect();

                let published = entry.published.or(entry.updated);

                Some(
                    Article::new(source, title, url)
                        .with_content(content)
                        .with_categories(categories)
                        .with_published(published),
                )
            })
            .collect();

        Ok(articles)
    }
}

impl Default for RssAtomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for RssAtomSource {
    fn can_handle(&self, kind: &SourceKind) -> bool {
        matches!(kind, SourceKind::Feed { .. })
    }

    fn fetch_articles(&self, source: &SourceConfig) -> CollectorResult<Vec<Article>> {
        let response = self.client.get(source.url()).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        Self::articles_from_bytes(source, &bytes)
    }
}

/// Extract plain text from HTML content, preserving word boundaries
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
        // Add space after block elements to preserve word boundaries
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" | "li" => text.push(' '),
                _ => {}
            }
        }
    }

    // Collapse whitespace and trim
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
