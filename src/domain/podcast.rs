use chrono::{FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// One published MP3 in the podcast feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastEpisode {
    pub date: NaiveDate,
    pub file_name: String,
    pub title: String,
    pub url: String,
    pub length: u64,
}

impl PodcastEpisode {
    pub fn new(date: NaiveDate, base_url: &str, length: u64) -> Self {
        let file_name = episode_file_name(date);
        Self {
            date,
            title: format!("{} AI News", date.format("%Y-%m-%d")),
            url: format!("{}/{}", base_url.trim_end_matches('/'), file_name),
            file_name,
            length,
        }
    }

    /// RFC 2822 timestamp of local midnight on the episode date
    pub fn pub_date(&self, offset: &FixedOffset) -> String {
        self.date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| offset.from_local_datetime(&naive).single())
            .map(|dt| dt.to_rfc2822())
            .unwrap_or_default()
    }
}

pub fn episode_file_name(date: NaiveDate) -> String {
    format!("podcast_{}.mp3", date.format("%Y-%m-%d"))
}

/// Date embedded in a `podcast_YYYY-MM-DD.mp3` file name
pub fn parse_episode_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_prefix("podcast_")?.strip_suffix(".mp3")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_naming() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        let episode = PodcastEpisode::new(date, "https://example.github.io/news/", 2048);

        assert_eq!(episode.file_name, "podcast_2024-05-07.mp3");
        assert_eq!(episode.title, "2024-05-07 AI News");
        assert_eq!(episode.url, "https://example.github.io/news/podcast_2024-05-07.mp3");
    }

    #[test]
    fn test_parse_episode_date() {
        assert_eq!(
            parse_episode_date("podcast_2024-05-07.mp3"),
            NaiveDate::from_ymd_opt(2024, 5, 7)
        );
        assert_eq!(parse_episode_date("podcast_latest.mp3"), None);
        assert_eq!(parse_episode_date("notes_2024-05-07.mp3"), None);
    }

    #[test]
    fn test_pub_date_uses_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        let episode = PodcastEpisode::new(date, "https://x", 1);
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();

        assert_eq!(episode.pub_date(&jst), "Tue, 7 May 2024 00:00:00 +0900");
    }
}
