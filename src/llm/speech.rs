use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::errors::{CollectorError, CollectorResult};

pub const TTS_MODEL: &str = "tts-1";
pub const TTS_VOICE: &str = "nova";

/// Text in, encoded audio out
#[cfg_attr(test, mockall::automock)]
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str) -> CollectorResult<Vec<u8>>;
}

/// OpenAI `audio/speech` endpoint producing MP3
pub struct OpenAiSpeech {
    url: String,
    api_key: String,
    client: Client,
}

impl OpenAiSpeech {
    pub fn new(base_url: &str, api_key: &str) -> CollectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            url: format!("{}/audio/speech", base_url.trim_end_matches('/')),
            api_key: api_key.trim().to_string(),
            client,
        })
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

impl SpeechSynthesizer for OpenAiSpeech {
    fn synthesize(&self, text: &str) -> CollectorResult<Vec<u8>> {
        let body = SpeechRequest {
            model: TTS_MODEL,
            voice: TTS_VOICE,
            input: text,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(CollectorError::Speech(format!("OpenAI returned {}: {}", status, text)));
        }

        let audio = response.bytes()?.to_vec();
        if audio.is_empty() {
            return Err(CollectorError::Speech("empty audio response".to_string()));
        }
        Ok(audio)
    }
}
