use crate::config::{SourceConfig, SourceKind};
use crate::domain::Article;
use crate::errors::CollectorResult;

pub trait FeedSource: Send + Sync {
    /// Check if this source can read the given kind of source
    fn can_handle(&self, kind: &SourceKind) -> bool;

    /// Fetch every article currently listed by the source, unfiltered
    fn fetch_articles(&self, source: &SourceConfig) -> CollectorResult<Vec<Article>>;
}

/// What the pipeline asks for: a source's candidate articles, already filtered
#[cfg_attr(test, mockall::automock)]
pub trait ArticleFetcher {
    fn fetch(&self, source: &SourceConfig) -> CollectorResult<Vec<Article>>;
}
