use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Utc};

use crate::config::PodcastConfig;
use crate::domain::podcast::{parse_episode_date, PodcastEpisode};
use crate::errors::CollectorResult;

pub const FEED_FILE_NAME: &str = "feed.xml";

/// Writes the podcast RSS feed (RSS 2.0 + iTunes tags) from the MP3s on disk
pub struct FeedGenerator {
    config: PodcastConfig,
    offset: FixedOffset,
}

impl FeedGenerator {
    pub fn new(config: PodcastConfig, offset: FixedOffset) -> Self {
        Self { config, offset }
    }

    pub fn feed_path(&self) -> PathBuf {
        self.config.dir.join(FEED_FILE_NAME)
    }

    /// `podcast_YYYY-MM-DD.mp3` files in the podcast directory, newest first
    pub fn episodes(&self) -> CollectorResult<Vec<PodcastEpisode>> {
        if !self.config.dir.exists() {
            return Ok(Vec::new());
        }

        let mut episodes = Vec::new();
        for entry in fs::read_dir(&self.config.dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(date) = parse_episode_date(&file_name) else {
                continue;
            };
            let length = entry.metadata()?.len();
            episodes.push(PodcastEpisode::new(date, &self.config.base_url, length));
        }

        episodes.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(episodes)
    }

    pub fn render(&self, episodes: &[PodcastEpisode], built_at: DateTime<Utc>) -> String {
        let c = &self.config;
        let mut items = String::new();

        for episode in episodes {
            items.push_str(&format!(
                "    <item>\n      \
                 <title>{title}</title>\n      \
                 <pubDate>{pub_date}</pubDate>\n      \
                 <enclosure url=\"{url}\" type=\"audio/mpeg\" length=\"{length}\"/>\n      \
                 <guid isPermaLink=\"true\">{url}</guid>\n    \
                 </item>\n",
                title = xml_escape(&episode.title),
                pub_date = episode.pub_date(&self.offset),
                url = xml_escape(&episode.url),
                length = episode.length,
            ));
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <rss version=\"2.0\"\n     \
             xmlns:itunes=\"http://www.itunes.com/dtds/podcast-1.0.dtd\"\n     \
             xmlns:content=\"http://purl.org/rss/1.0/modules/content/\">\n  \
             <channel>\n    \
             <title>{title}</title>\n    \
             <link>{link}/</link>\n    \
             <description>{description}</description>\n    \
             <language>{language}</language>\n    \
             <lastBuildDate>{built}</lastBuildDate>\n    \
             <itunes:author>{author}</itunes:author>\n    \
             <itunes:summary>{description}</itunes:summary>\n    \
             <itunes:category text=\"Technology\"/>\n    \
             <itunes:explicit>false</itunes:explicit>\n\
             {items}  \
             </channel>\n\
             </rss>\n",
            title = xml_escape(&c.title),
            link = xml_escape(&c.base_url),
            description = xml_escape(&c.description),
            language = xml_escape(&c.language),
            built = built_at.to_rfc2822(),
            author = xml_escape(&c.author),
            items = items,
        )
    }

    /// Rescan and rewrite `feed.xml`; returns the episode count
    pub fn write(&self) -> CollectorResult<usize> {
        let episodes = self.episodes()?;
        let xml = self.render(&episodes, Utc::now());

        fs::create_dir_all(&self.config.dir)?;
        fs::write(self.feed_path(), xml)?;

        tracing::info!(
            episodes = episodes.len(),
            path = %self.feed_path().display(),
            "Podcast feed written"
        );
        Ok(episodes.len())
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn generator(dir: &TempDir) -> FeedGenerator {
        FeedGenerator::new(
            PodcastConfig {
                dir: dir.path().to_path_buf(),
                base_url: "https://example.github.io/news".to_string(),
                title: "AI News Daily".to_string(),
                description: "News & views".to_string(),
                author: "Collector".to_string(),
                language: "ja".to_string(),
            },
            FixedOffset::east_opt(9 * 3600).unwrap(),
        )
    }

    #[test]
    fn test_episodes_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("podcast_2024-05-01.mp3"), b"aaa").unwrap();
        fs::write(dir.path().join("podcast_2024-05-03.mp3"), b"bbbbb").unwrap();
        fs::write(dir.path().join("cover.png"), b"png").unwrap();

        let episodes = generator(&dir).episodes().unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].file_name, "podcast_2024-05-03.mp3");
        assert_eq!(episodes[0].length, 5);
        assert_eq!(episodes[1].file_name, "podcast_2024-05-01.mp3");
    }

    #[test]
    fn test_missing_dir_has_no_episodes() {
        let dir = TempDir::new().unwrap();
        let mut gen = generator(&dir);
        gen.config.dir = dir.path().join("nope");
        assert!(gen.episodes().unwrap().is_empty());
    }

    #[test]
    fn test_render_items_and_escaping() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("podcast_2024-05-03.mp3"), b"bbbbb").unwrap();
        let gen = generator(&dir);
        let episodes = gen.episodes().unwrap();
        let built = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();

        let xml = gen.render(&episodes, built);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<description>News &amp; views</description>"));
        assert!(xml.contains("<title>2024-05-03 AI News</title>"));
        assert!(xml.contains(
            "<enclosure url=\"https://example.github.io/news/podcast_2024-05-03.mp3\" type=\"audio/mpeg\" length=\"5\"/>"
        ));
        assert!(xml.contains("<pubDate>Fri, 3 May 2024 00:00:00 +0900</pubDate>"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn test_write_creates_feed_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("podcast_2024-05-03.mp3"), b"x").unwrap();

        let gen = generator(&dir);
        assert_eq!(gen.write().unwrap(), 1);

        let xml = fs::read_to_string(gen.feed_path()).unwrap();
        assert!(xml.contains("podcast_2024-05-03.mp3"));
    }
}
