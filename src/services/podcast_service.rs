use std::fs;
use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate, Utc};
use notion::{Block, CreatePage, PropertyValue, MAX_TEXT_LEN};

use crate::config::PodcastConfig;
use crate::domain::podcast::episode_file_name;
use crate::errors::CollectorResult;
use crate::llm::{CompletionClient, SpeechSynthesizer};
use crate::services::feed_generator::FeedGenerator;
use crate::services::pipeline::ProcessedArticle;
use crate::services::sink_service::PageWriter;

const SCRIPT_MAX_TOKENS: u32 = 1500;
const OVERVIEW_EXCERPT_CHARS: usize = 500;
const PODCAST_LABEL: &str = "Podcast";

/// Turns the day's processed articles into a narrated MP3, a database page and a feed entry
pub struct PodcastService<'a> {
    llm: &'a dyn CompletionClient,
    speech: &'a dyn SpeechSynthesizer,
    writer: &'a dyn PageWriter,
    database_id: String,
    language: String,
    config: PodcastConfig,
    offset: FixedOffset,
}

impl<'a> PodcastService<'a> {
    pub fn new(
        llm: &'a dyn CompletionClient,
        speech: &'a dyn SpeechSynthesizer,
        writer: &'a dyn PageWriter,
        database_id: &str,
        language: &str,
        config: PodcastConfig,
        offset: FixedOffset,
    ) -> Self {
        Self {
            llm,
            speech,
            writer,
            database_id: database_id.to_string(),
            language: language.to_string(),
            config,
            offset,
        }
    }

    pub fn build_prompt(&self, articles: &[ProcessedArticle]) -> String {
        let listing = articles
            .iter()
            .map(|p| {
                let overview: String = p
                    .summary
                    .overview
                    .chars()
                    .take(OVERVIEW_EXCERPT_CHARS)
                    .collect();
                format!("[{}] {}\n{}", p.article.source, p.article.title, overview)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "Write a radio-style narration script in {language} for business leaders, \
             covering today's enterprise AI news below.\n\
             \n\
             {listing}\n\
             \n\
             Requirements:\n\
             - Open with a short greeting introducing today's enterprise AI news\n\
             - Focus on business impact, adoption examples and industry trends\n\
             - Keep an executive point of view: how could our company use this?\n\
             - Link the stories with natural transitions\n\
             - Rephrase jargon in plain words\n\
             - Around three to four minutes when read aloud\n\
             - Close with a short sign-off until tomorrow\n\
             - Plain text only, no markdown, suitable for reading aloud\n",
            language = self.language,
            listing = listing,
        )
    }

    /// Produce today's episode; errors are returned to the caller, which logs them
    pub fn publish(&self, articles: &[ProcessedArticle]) -> CollectorResult<PathBuf> {
        let today = Utc::now().with_timezone(&self.offset).date_naive();
        self.publish_for(articles, today)
    }

    pub fn publish_for(
        &self,
        articles: &[ProcessedArticle],
        date: NaiveDate,
    ) -> CollectorResult<PathBuf> {
        tracing::info!(articles = articles.len(), "Generating podcast script");
        let script = self
            .llm
            .complete(&self.build_prompt(articles), SCRIPT_MAX_TOKENS)?;

        let audio = self.speech.synthesize(&script)?;

        fs::create_dir_all(&self.config.dir)?;
        let file_name = episode_file_name(date);
        let path = self.config.dir.join(&file_name);
        fs::write(&path, &audio)?;
        tracing::info!(
            file = %file_name,
            size_kb = audio.len() / 1024,
            "Podcast MP3 saved"
        );

        let page = self.script_page(&script, date, &file_name);
        self.writer.create_page(&page)?;
        tracing::info!(date = %date, "Podcast page created");

        FeedGenerator::new(self.config.clone(), self.offset).write()?;

        Ok(path)
    }

    pub fn script_page(&self, script: &str, date: NaiveDate, file_name: &str) -> CreatePage {
        let date_str = date.format("%Y-%m-%d").to_string();

        CreatePage::new(&self.database_id)
            .property(
                "Name",
                PropertyValue::title(&format!("{} AI News Podcast", date_str)),
            )
            .property("Source", PropertyValue::select(PODCAST_LABEL))
            .property("Tag", PropertyValue::select(PODCAST_LABEL))
            .property(
                "URL",
                PropertyValue::url(&format!("{}/{}", self.config.base_url, file_name)),
            )
            .property("Published", PropertyValue::date(&date_str))
            .children(script_blocks(script))
    }
}

/// One paragraph per non-empty line, long lines split at the text limit
fn script_blocks(script: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let chars: Vec<char> = line.chars().collect();
        for chunk in chars.chunks(MAX_TEXT_LEN) {
            blocks.push(Block::paragraph(&chunk.iter().collect::<String>()));
        }
    }

    blocks
}
