use std::time::Duration;

use reqwest::blocking::Client;

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; AI-News-Collector/1.0)";

/// Shared client for feed and page downloads
pub fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}
