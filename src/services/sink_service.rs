use chrono::FixedOffset;
use notion::{CreatePage, NotionClient};

use crate::config::Config;
use crate::domain::{Article, SinkRecord, Summary};
use crate::errors::CollectorResult;

#[cfg_attr(test, mockall::automock)]
pub trait Sink {
    /// Create the database page for one summarized article
    fn write(&self, article: &Article, summary: &Summary) -> CollectorResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PageWriter {
    /// Create an arbitrary page in the sink database
    fn create_page(&self, page: &CreatePage) -> CollectorResult<()>;
}

/// Writes pages into the configured Notion database
pub struct NotionSink {
    client: NotionClient,
    database_id: String,
    offset: FixedOffset,
}

impl NotionSink {
    pub fn new(config: &Config) -> CollectorResult<Self> {
        let client = NotionClient::with_base_url(&config.notion_api_url, &config.notion_api_key)?;

        Ok(Self {
            client,
            database_id: config.notion_database_id.clone(),
            offset: config.utc_offset,
        })
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }
}

impl PageWriter for NotionSink {
    fn create_page(&self, page: &CreatePage) -> CollectorResult<()> {
        let created = self.client.create_page(page)?;
        tracing::debug!(page_id = %created.id, "Notion page created");
        Ok(())
    }
}

impl Sink for NotionSink {
    fn write(&self, article: &Article, summary: &Summary) -> CollectorResult<()> {
        let record = SinkRecord::from_article(article, summary, &self.offset);
        self.create_page(&record.to_page(&self.database_id))
    }
}
