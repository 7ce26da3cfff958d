mod sources;

use std::path::PathBuf;

use chrono::FixedOffset;

use crate::errors::{CollectorError, CollectorResult};

pub use sources::{default_sources, SourceConfig, SourceKind, SCRAPE_MAX_NEW_ARTICLES};

pub const DEFAULT_MODEL: &str = "claude-haiku-4-5";
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_RECENT_HOURS: i64 = 72;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

#[derive(Debug, Clone)]
pub struct PodcastConfig {
    pub dir: PathBuf,
    pub base_url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub model: String,
    pub summary_language: String,
    pub notion_api_key: String,
    pub notion_api_url: String,
    pub notion_database_id: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub state_path: PathBuf,
    pub log_path: PathBuf,
    pub recent_hours: i64,
    pub utc_offset: FixedOffset,
    pub podcast: PodcastConfig,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    fn beside_exe(file: &str) -> PathBuf {
        Self::exe_dir()
            .map(|d| d.join(file))
            .unwrap_or_else(|| PathBuf::from(".").join(file))
    }

    /// Log file used before configuration is known
    pub fn default_log_path() -> PathBuf {
        std::env::var("COLLECTOR_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::beside_exe("collector.log"))
    }

    pub fn from_env() -> CollectorResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> CollectorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| CollectorError::MissingEnvVar(key.to_string()))
        };

        let anthropic_api_key = required("ANTHROPIC_API_KEY")?;
        let notion_api_key = required("NOTION_API_KEY")?;
        let notion_database_id = required("NOTION_DATABASE_ID")?;

        let recent_hours = match optional("COLLECTOR_RECENT_HOURS") {
            Some(v) => v.trim().parse::<i64>().map_err(|_| {
                CollectorError::Config(format!("COLLECTOR_RECENT_HOURS is not a number: {}", v))
            })?,
            None => DEFAULT_RECENT_HOURS,
        };

        let offset_hours = match optional("COLLECTOR_UTC_OFFSET_HOURS") {
            Some(v) => v.trim().parse::<i32>().map_err(|_| {
                CollectorError::Config(format!(
                    "COLLECTOR_UTC_OFFSET_HOURS is not a number: {}",
                    v
                ))
            })?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
            CollectorError::Config(format!("UTC offset out of range: {}", offset_hours))
        })?;

        let state_path = optional("COLLECTOR_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::beside_exe("seen_ids.json"));
        let log_path = optional("COLLECTOR_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::beside_exe("collector.log"));

        let podcast = PodcastConfig {
            dir: optional("COLLECTOR_PODCAST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| Self::beside_exe("docs")),
            base_url: optional("COLLECTOR_PODCAST_BASE_URL")
                .unwrap_or_else(|| "http://localhost/podcast".to_string())
                .trim_end_matches('/')
                .to_string(),
            title: optional("COLLECTOR_PODCAST_TITLE")
                .unwrap_or_else(|| "AI News Daily".to_string()),
            description: optional("COLLECTOR_PODCAST_DESCRIPTION").unwrap_or_else(|| {
                "Daily digest of enterprise AI news from Anthropic, OpenAI, Google, a16z and Salesforce."
                    .to_string()
            }),
            author: optional("COLLECTOR_PODCAST_AUTHOR")
                .unwrap_or_else(|| "AI News Collector".to_string()),
            language: optional("COLLECTOR_PODCAST_LANGUAGE").unwrap_or_else(|| "ja".to_string()),
        };

        Ok(Self {
            anthropic_api_key,
            anthropic_api_url: optional("ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_URL.to_string()),
            model: optional("COLLECTOR_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            summary_language: optional("COLLECTOR_SUMMARY_LANGUAGE")
                .unwrap_or_else(|| "Japanese".to_string()),
            notion_api_key,
            notion_api_url: optional("NOTION_API_URL")
                .unwrap_or_else(|| notion::DEFAULT_API_URL.to_string()),
            notion_database_id,
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_api_url: optional("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            state_path,
            log_path,
            recent_hours,
            utc_offset,
            podcast,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required() -> HashMap<String, String> {
        env(&[
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("NOTION_API_KEY", "secret_notion"),
            ("NOTION_DATABASE_ID", "db123"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let vars = required();
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.recent_hours, 72);
        assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
        assert!(config.openai_api_key.is_none());
        assert!(config.state_path.ends_with("seen_ids.json"));
        assert_eq!(config.notion_api_url, notion::DEFAULT_API_URL);
    }

    #[test]
    fn test_missing_required_var() {
        let mut vars = required();
        vars.remove("NOTION_DATABASE_ID");

        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(
            matches!(err, CollectorError::MissingEnvVar(ref k) if k == "NOTION_DATABASE_ID"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut vars = required();
        vars.insert("ANTHROPIC_API_KEY".to_string(), "  ".to_string());

        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, CollectorError::MissingEnvVar(_)));
    }

    #[test]
    fn test_overrides() {
        let mut vars = required();
        vars.insert("COLLECTOR_RECENT_HOURS".to_string(), "24".to_string());
        vars.insert("COLLECTOR_UTC_OFFSET_HOURS".to_string(), "0".to_string());
        vars.insert("COLLECTOR_STATE_PATH".to_string(), "/tmp/state.db".to_string());
        vars.insert("OPENAI_API_KEY".to_string(), "sk-openai".to_string());
        vars.insert(
            "COLLECTOR_PODCAST_BASE_URL".to_string(),
            "https://example.github.io/news/".to_string(),
        );

        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.recent_hours, 24);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert_eq!(config.state_path, PathBuf::from("/tmp/state.db"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.podcast.base_url, "https://example.github.io/news");
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let mut vars = required();
        vars.insert("COLLECTOR_RECENT_HOURS".to_string(), "three days".to_string());

        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }
}
