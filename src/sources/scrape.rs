use std::collections::{HashMap, HashSet};

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::config::{SourceConfig, SourceKind};
use crate::domain::Article;
use crate::errors::{CollectorError, CollectorResult};
use crate::sources::http::build_client;
use crate::sources::traits::FeedSource;

/// Link fragments that mark navigation rather than articles
const SKIP_PATTERNS: &[&str] = &["#", "?page=", "/podcast", "/video", "/category"];

/// Anchor text outside this range is navigation chrome, not a headline
const MIN_TITLE_CHARS: usize = 10;
const MAX_TITLE_CHARS: usize = 120;

/// Reads article links off an HTML listing page for sites without a feed
pub struct ScrapeSource {
    client: Client,
}

impl ScrapeSource {
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }

    /// Extract candidate articles from a listing page, in page order
    pub fn articles_from_html(source: &SourceConfig, html: &str) -> CollectorResult<Vec<Article>> {
        let base = Url::parse(source.url()).map_err(|e| CollectorError::InvalidUrl(e.to_string()))?;
        let host = base
            .host_str()
            .ok_or_else(|| CollectorError::InvalidUrl("Missing host".to_string()))?
            .to_string();

        let document = Html::parse_document(html);
        let link_selector = Selector::parse("a[href]").unwrap();

        // Page order of article links, and the first headline-like anchor text per link
        let mut seen_urls = HashSet::new();
        let mut urls: Vec<String> = Vec::new();
        let mut titles: HashMap<String, String> = HashMap::new();

        for element in document.select(&link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(url) = base.join(href) else {
                continue;
            };
            if url.host_str() != Some(host.as_str()) || url.path() == "/" {
                continue;
            }

            let url = url.to_string();
            if url == source.url() || SKIP_PATTERNS.iter().any(|p| url.contains(p)) {
                continue;
            }
            if seen_urls.insert(url.clone()) {
                urls.push(url.clone());
            }

            let anchor_text = element.text().collect::<Vec<_>>().join(" ");
            let anchor_text = anchor_text.split_whitespace().collect::<Vec<_>>().join(" ");
            if (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&anchor_text.chars().count()) {
                titles.entry(url).or_insert(anchor_text);
            }
        }

        let articles = urls
            .into_iter()
            .map(|url| {
                let title = titles.remove(&url).unwrap_or_else(|| title_from_slug(&url));
                Article::new(source, title, url)
            })
            .collect();

        Ok(articles)
    }
}

impl Default for ScrapeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for ScrapeSource {
    fn can_handle(&self, kind: &SourceKind) -> bool {
        matches!(kind, SourceKind::Scrape { .. })
    }

    fn fetch_articles(&self, source: &SourceConfig) -> CollectorResult<Vec<Article>> {
        let html = self
            .client
            .get(source.url())
            .send()?
            .error_for_status()?
            .text()?;

        Self::articles_from_html(source, &html)
    }
}

/// "https://a16z.com/big-ideas-in-ai/" -> "Big Ideas In Ai"
fn title_from_slug(url: &str) -> String {
    let slug = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url);

    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
