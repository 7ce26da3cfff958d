/// Where a source's articles come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// RSS, Atom or JSON feed
    Feed { url: String },
    /// HTML listing page whose article links are scraped
    Scrape { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub name: String,
    pub tag: String,
    pub kind: SourceKind,
    pub filter_keywords: Vec<String>,
    /// Cap on unseen articles processed per run
    pub max_new_articles: Option<usize>,
}

/// Scraped listings can carry dozens of links; only the newest are taken
pub const SCRAPE_MAX_NEW_ARTICLES: usize = 10;

impl SourceConfig {
    pub fn feed(name: &str, tag: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            tag: tag.to_string(),
            kind: SourceKind::Feed {
                url: url.to_string(),
            },
            filter_keywords: Vec::new(),
            max_new_articles: None,
        }
    }

    pub fn scrape(name: &str, tag: &str, url: &str) -> Self {
        Self {
            kind: SourceKind::Scrape {
                url: url.to_string(),
            },
            max_new_articles: Some(SCRAPE_MAX_NEW_ARTICLES),
            ..Self::feed(name, tag, url)
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.filter_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn url(&self) -> &str {
        match &self.kind {
            SourceKind::Feed { url } | SourceKind::Scrape { url } => url,
        }
    }

    /// True when the text mentions any filter keyword (case-insensitive),
    /// or when the source has no keywords at all
    pub fn matches_keywords(&self, text: &str) -> bool {
        if self.filter_keywords.is_empty() {
            return true;
        }
        let text = text.to_lowercase();
        self.filter_keywords
            .iter()
            .any(|kw| text.contains(&kw.to_lowercase()))
    }
}

const SALESFORCE_KEYWORDS: &[&str] = &[
    "AI",
    "LLM",
    "Agentforce",
    "machine learning",
    "agent",
    "artificial intelligence",
];

/// The blogs polled on every run
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        // Community mirror; the official news page has no feed
        SourceConfig::feed(
            "Anthropic Blog",
            "Anthropic",
            "https://raw.githubusercontent.com/Olshansk/rss-feeds/refs/heads/main/feeds/feed_anthropic_news.xml",
        )
        .with_keywords(&[
            "enterprise", "agent", "Claude", "API", "deployment", "business",
            "partner", "case study", "customers", "tools", "model",
        ]),
        SourceConfig::feed("OpenAI Blog", "OpenAI", "https://openai.com/blog/rss.xml")
            .with_keywords(&[
                "enterprise", "agent", "GPT", "API", "deployment", "business",
                "partner", "case study", "customers", "o1", "o3",
            ]),
        SourceConfig::feed(
            "Google DeepMind Blog",
            "Google",
            "https://deepmind.google/blog/rss.xml",
        )
        .with_keywords(&[
            "enterprise", "agent", "Gemini", "API", "deployment", "business",
            "partner", "Vertex", "application", "product",
        ]),
        SourceConfig::scrape("a16z Newsletter", "a16z", "https://a16z.com/news-content/")
            .with_keywords(&[
                "AI",
                "LLM",
                "machine learning",
                "foundation model",
                "artificial intelligence",
                "agent",
            ]),
        SourceConfig::feed(
            "Salesforce Engineering Blog",
            "Salesforce",
            "https://engineering.salesforce.com/feed/",
        )
        .with_keywords(SALESFORCE_KEYWORDS),
        SourceConfig::feed(
            "Salesforce Blog",
            "Salesforce",
            "https://www.salesforce.com/blog/feed/",
        )
        // Mostly non-AI posts, so the filter is required here
        .with_keywords(SALESFORCE_KEYWORDS),
        SourceConfig::feed(
            "VentureBeat AI",
            "VentureBeat",
            "https://venturebeat.com/category/ai/feed/",
        )
        .with_keywords(&[
            "enterprise", "agent", "agentic", "deployment", "adoption", "case study",
            "ROI", "implementation", "CTO", "CEO", "strategy", "Salesforce", "Microsoft",
            "Google", "AWS", "SAP", "ServiceNow", "workflow", "automation",
        ]),
    ]
}
