pub mod traits;
pub mod http;
pub mod rss_atom;
pub mod scrape;
pub mod registry;

pub use traits::{ArticleFetcher, FeedSource};
pub use registry::SourceRegistry;
