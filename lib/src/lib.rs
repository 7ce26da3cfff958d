//! Minimal Notion bindings for Rust
//! Provides page creation in a database with typed properties and body blocks

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion rejects more than 100 children in a single create call
pub const MAX_CHILDREN: usize = 100;

/// Notion rejects rich text runs longer than 2000 characters
pub const MAX_TEXT_LEN: usize = 2000;

#[derive(Error, Debug)]
pub enum NotionError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Notion API error [{status}] {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("Invalid header value")]
    InvalidHeader,
}

impl NotionError {
    /// Map a non-2xx status and its body; bodies that aren't Notion's error JSON keep the raw text
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(err) if !err.code.is_empty() => NotionError::Api {
                status,
                code: err.code,
                message: err.message,
            },
            _ => NotionError::Api {
                status,
                code: "unknown".to_string(),
                message: if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.trim().to_string()
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: TextContent,
}

impl RichText {
    /// Plain text run, cut to the per-run limit
    pub fn plain(content: &str) -> Self {
        Self {
            kind: "text".to_string(),
            text: TextContent {
                content: truncate_chars(content, MAX_TEXT_LEN),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
}

/// A page property value, serialized as `{"<type>": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichText>),
    Select(SelectOption),
    Url(String),
    Date(DateValue),
}

impl PropertyValue {
    pub fn title(content: &str) -> Self {
        PropertyValue::Title(vec![RichText::plain(content)])
    }

    pub fn select(name: &str) -> Self {
        PropertyValue::Select(SelectOption {
            name: name.to_string(),
        })
    }

    pub fn url(url: &str) -> Self {
        PropertyValue::Url(url.to_string())
    }

    /// `start` is an ISO 8601 date or datetime
    pub fn date(start: &str) -> Self {
        PropertyValue::Date(DateValue {
            start: start.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBody {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockContent {
    #[serde(rename = "heading_2")]
    Heading2(RichTextBody),
    #[serde(rename = "paragraph")]
    Paragraph(RichTextBody),
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem(RichTextBody),
}

/// A child block, serialized as
/// `{"object": "block", "type": "<kind>", "<kind>": {"rich_text": [...]}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub object: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub content: BlockContent,
}

impl Block {
    fn new(kind: &str, content: BlockContent) -> Self {
        Self {
            object: "block".to_string(),
            kind: kind.to_string(),
            content,
        }
    }

    fn body(text: &str) -> RichTextBody {
        RichTextBody {
            rich_text: vec![RichText::plain(text)],
        }
    }

    pub fn heading_2(text: &str) -> Self {
        Self::new("heading_2", BlockContent::Heading2(Self::body(text)))
    }

    pub fn paragraph(text: &str) -> Self {
        Self::new("paragraph", BlockContent::Paragraph(Self::body(text)))
    }

    pub fn bulleted_list_item(text: &str) -> Self {
        Self::new(
            "bulleted_list_item",
            BlockContent::BulletedListItem(Self::body(text)),
        )
    }

    /// Plain text of the block's first rich text run
    pub fn text(&self) -> &str {
        let body = match &self.content {
            BlockContent::Heading2(b)
            | BlockContent::Paragraph(b)
            | BlockContent::BulletedListItem(b) => b,
        };
        body.rich_text
            .first()
            .map(|t| t.text.content.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseParent {
    pub database_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePage {
    pub parent: DatabaseParent,
    pub properties: BTreeMap<String, PropertyValue>,
    pub children: Vec<Block>,
}

impl CreatePage {
    pub fn new(database_id: &str) -> Self {
        Self {
            parent: DatabaseParent {
                database_id: database_id.to_string(),
            },
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn property(mut self, name: &str, value: PropertyValue) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Append children, dropping anything past the per-call limit
    pub fn children(mut self, blocks: Vec<Block>) -> Self {
        self.children.extend(blocks);
        self.children.truncate(MAX_CHILDREN);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

pub struct NotionClient {
    url: String,
    client: Client,
}

impl NotionClient {
    pub fn new(token: &str) -> Result<Self, NotionError> {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    pub fn with_base_url(url: &str, token: &str) -> Result<Self, NotionError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|_| NotionError::InvalidHeader)?,
        );
        headers.insert(
            HeaderName::from_static("notion-version"),
            HeaderValue::from_static(NOTION_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a page inside a database
    pub fn create_page(&self, page: &CreatePage) -> Result<Page, NotionError> {
        let response = self
            .client
            .post(format!("{}/pages", self.url))
            .json(page)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NotionError::from_response(status.as_u16(), &body));
        }

        Ok(response.json()?)
    }
}

/// Truncate string to at most `max_chars` characters, respecting char boundaries
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
