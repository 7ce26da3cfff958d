use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::errors::{CollectorError, CollectorResult};
use crate::llm::CompletionClient;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API, one user turn per call
pub struct AnthropicClient {
    url: String,
    model: String,
    client: Client,
}

impl AnthropicClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> CollectorResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key.trim())
                .map_err(|_| CollectorError::Config("invalid Anthropic API key".to_string()))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            url: format!("{}/messages", base_url.trim_end_matches('/')),
            model: model.to_string(),
            client,
        })
    }

    /// Non-2xx reply as an `Llm` error, using the API's error type and message when present
    fn error_from_response(status: u16, body: &str) -> CollectorError {
        let detail = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => format!("{}: {}", parsed.error.kind, parsed.error.message),
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.trim().to_string(),
        };
        CollectorError::Llm(format!("Anthropic returned {}: {}", status, detail))
    }

    /// Join the text blocks of a response; a response without text is an error
    fn extract_text(response: MessagesResponse) -> CollectorResult<String> {
        let text = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(CollectorError::Llm(
                "response missing text content".to_string(),
            ));
        }
        Ok(text)
    }
}

impl CompletionClient for AnthropicClient {
    fn complete(&self, prompt: &str, max_tokens: u32) -> CollectorResult<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self.client.post(&self.url).json(&body).send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(Self::error_from_response(status, &body));
        }

        let parsed: MessagesResponse = response
            .json()
            .map_err(|e| CollectorError::Llm(format!("unexpected response shape: {}", e)))?;

        Self::extract_text(parsed)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r###"{"content": [
                {"type": "text", "text": "## Overview"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": "Body"}
            ]}"###,
        )
        .unwrap();

        assert_eq!(AnthropicClient::extract_text(response).unwrap(), "## Overview\nBody");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        let err = AnthropicClient::extract_text(response).unwrap_err();
        assert!(matches!(err, CollectorError::Llm(_)));
    }

    #[test]
    fn test_rate_limit_reply_is_llm_error() {
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"Number of requests has exceeded your rate limit"}}"#;

        match AnthropicClient::error_from_response(429, body) {
            CollectorError::Llm(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate_limit_error"));
                assert!(msg.contains("exceeded your rate limit"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_non_json_error_body_kept_verbatim() {
        let err = AnthropicClient::error_from_response(503, "upstream connect error");
        assert!(matches!(err, CollectorError::Llm(ref msg) if msg == "Anthropic returned 503: upstream connect error"));

        let err = AnthropicClient::error_from_response(500, "  ");
        assert!(matches!(err, CollectorError::Llm(ref msg) if msg == "Anthropic returned 500: empty response body"));
    }

    #[test]
    fn test_request_shape() {
        let body = MessagesRequest {
            model: "claude-haiku-4-5",
            max_tokens: 600,
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "claude-haiku-4-5");
        assert_eq!(value["max_tokens"], 600);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_url_built_from_base() {
        let client = AnthropicClient::new("https://api.anthropic.com/v1/", "key", "m").unwrap();
        assert_eq!(client.url, "https://api.anthropic.com/v1/messages");
    }
}
