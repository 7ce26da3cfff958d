pub mod article;
pub mod summary;
pub mod sink_record;
pub mod podcast;

pub use article::{article_id, Article};
pub use summary::{Importance, ImportanceLevel, Summary};
pub use sink_record::SinkRecord;
pub use podcast::PodcastEpisode;
