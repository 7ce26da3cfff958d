use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SourceConfig;

/// Longest content excerpt handed to the summarizer
pub const MAX_CONTENT_CHARS: usize = 3000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub source: String,
    pub tag: String,
    pub title: String,
    pub url: String,
    pub content: Option<String>,
    pub categories: Vec<String>,
    pub published: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(source: &SourceConfig, title: String, url: String) -> Self {
        Self {
            id: article_id(&url),
            source: source.name.clone(),
            tag: source.tag.clone(),
            title,
            url,
            content: None,
            categories: Vec::new(),
            published: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content.map(|c| c.chars().take(MAX_CONTENT_CHARS).collect());
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }

    /// Text the keyword filter looks at: title, summary and categories
    pub fn filter_text(&self) -> String {
        let mut text = self.title.clone();
        if let Some(content) = &self.content {
            text.push(' ');
            text.push_str(content);
        }
        for category in &self.categories {
            text.push(' ');
            text.push_str(category);
        }
        text
    }

    /// Undated articles always count as recent
    pub fn is_recent(&self, now: DateTime<Utc>, window_hours: i64) -> bool {
        match self.published {
            Some(published) => now - published < Duration::hours(window_hours),
            None => true,
        }
    }

    /// Title cut down for log lines
    pub fn short_title(&self) -> String {
        self.title.chars().take(60).collect()
    }
}

/// Stable seen-ID for an article: hex MD5 of its URL
pub fn article_id(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn source() -> SourceConfig {
        SourceConfig::feed("Example Blog", "Example", "https://example.com/feed")
    }

    #[test]
    fn test_id_is_md5_of_url() {
        let article = Article::new(&source(), "Hello".to_string(), "https://example.com/a".to_string());
        assert_eq!(article.id, article_id("https://example.com/a"));
        assert_eq!(article.id.len(), 32);
        assert_eq!(article_id(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_source_fields_copied() {
        let article = Article::new(&source(), "Hello".to_string(), "https://example.com/a".to_string());
        assert_eq!(article.source, "Example Blog");
        assert_eq!(article.tag, "Example");
    }

    #[test]
    fn test_content_truncated() {
        let article = Article::new(&source(), "T".to_string(), "u".to_string())
            .with_content(Some("x".repeat(MAX_CONTENT_CHARS + 500)));
        assert_eq!(article.content.unwrap().chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_recency_window() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let base = Article::new(&source(), "T".to_string(), "u".to_string());

        let fresh = base.clone().with_published(Some(now - Duration::hours(10)));
        let stale = base.clone().with_published(Some(now - Duration::hours(100)));

        assert!(fresh.is_recent(now, 72));
        assert!(!stale.is_recent(now, 72));
        assert!(base.is_recent(now, 72), "undated articles are kept");
    }

    #[test]
    fn test_filter_text_includes_categories() {
        let article = Article::new(&source(), "Release notes".to_string(), "u".to_string())
            .with_categories(vec!["AI".to_string()]);
        assert!(article.filter_text().contains("AI"));
    }
}
