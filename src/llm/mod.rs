pub mod anthropic;
pub mod speech;

pub use anthropic::AnthropicClient;
pub use speech::{OpenAiSpeech, SpeechSynthesizer};

use crate::errors::CollectorResult;

/// A single-prompt text completion
#[cfg_attr(test, mockall::automock)]
pub trait CompletionClient {
    fn complete(&self, prompt: &str, max_tokens: u32) -> CollectorResult<String>;
}
