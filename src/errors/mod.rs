use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Language model errors
    #[error("Language model request failed: {0}")]
    Llm(String),

    #[error("Malformed summary: {0}")]
    MalformedSummary(String),

    // Sink errors from the notion library
    #[error("Notion error: {0}")]
    Sink(#[from] notion::NotionError),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("State file error: {0}")]
    State(#[from] serde_json::Error),

    // Scheduler errors
    #[error("Scheduler error: {0}")]
    Schedule(String),

    // Podcast errors
    #[error("Text-to-speech failed: {0}")]
    Speech(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CollectorResult<T> = Result<T, CollectorError>;
