use crate::domain::summary::{IMPORTANCE_HEADING, KEY_POINTS_HEADING, OVERVIEW_HEADING};
use crate::domain::{Article, Summary};
use crate::errors::CollectorResult;
use crate::llm::CompletionClient;

const SUMMARY_MAX_TOKENS: u32 = 600;

#[cfg_attr(test, mockall::automock)]
pub trait Summarizer {
    fn summarize(&self, article: &Article) -> CollectorResult<Summary>;
}

/// Summarizes through a language model and parses its markdown reply
pub struct LlmSummarizer<C: CompletionClient> {
    client: C,
    language: String,
}

impl<C: CompletionClient> LlmSummarizer<C> {
    pub fn new(client: C, language: &str) -> Self {
        Self {
            client,
            language: language.to_string(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn build_prompt(&self, article: &Article) -> String {
        let excerpt = article
            .content
            .as_deref()
            .unwrap_or("(no excerpt available; infer from the title and URL)");

        format!(
            "Summarize the following AI-related article in {language}.\n\
             Focus on what matters for enterprise AI adoption and use.\n\
             \n\
             Title: {title}\n\
             URL: {url}\n\
             Excerpt:\n\
             {excerpt}\n\
             \n\
             Reply in markdown with exactly these three sections. Keep the headings in English.\n\
             \n\
             ## {overview}\n\
             (2-3 sentences explaining the main point)\n\
             \n\
             ## {key_points}\n\
             - Affected industries or departments (e.g. sales, customer support, manufacturing)\n\
             - 2-4 bullets on how to adopt or apply this\n\
             \n\
             ## {importance}\n\
             High, Medium or Low, followed by \" - \" and a one-sentence reason\n",
            language = self.language,
            title = article.title,
            url = article.url,
            excerpt = excerpt,
            overview = OVERVIEW_HEADING,
            key_points = KEY_POINTS_HEADING,
            importance = IMPORTANCE_HEADING,
        )
    }
}

impl<C: CompletionClient> Summarizer for LlmSummarizer<C> {
    fn summarize(&self, article: &Article) -> CollectorResult<Summary> {
        let prompt = self.build_prompt(article);
        let reply = self.client.complete(&prompt, SUMMARY_MAX_TOKENS)?;

        Summary::parse(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::domain::ImportanceLevel;
    use crate::errors::CollectorError;
    use crate::llm::MockCompletionClient;

    fn article() -> Article {
        let source = SourceConfig::feed("OpenAI Blog", "OpenAI", "https://openai.com/blog/rss.xml");
        Article::new(
            &source,
            "Introducing agents".to_string(),
            "https://openai.com/index/agents".to_string(),
        )
        .with_content(Some("Agents can now use tools.".to_string()))
    }

    #[test]
    fn test_prompt_contains_article_and_sections() {
        let summarizer = LlmSummarizer::new(MockCompletionClient::new(), "Japanese");
        let prompt = summarizer.build_prompt(&article());

        assert!(prompt.contains("in Japanese"));
        assert!(prompt.contains("Title: Introducing agents"));
        assert!(prompt.contains("URL: https://openai.com/index/agents"));
        assert!(prompt.contains("Agents can now use tools."));
        assert!(prompt.contains("## Overview"));
        assert!(prompt.contains("## Key Points"));
        assert!(prompt.contains("## Importance"));
    }

    #[test]
    fn test_summarize_parses_reply() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|prompt, max_tokens| prompt.contains("Introducing agents") && *max_tokens == 600)
            .times(1)
            .returning(|_, _| {
                Ok("## Overview\nTools for agents.\n## Key Points\n- Support\n## Importance\nLow - incremental".to_string())
            });

        let summary = LlmSummarizer::new(client, "English")
            .summarize(&article())
            .unwrap();

        assert_eq!(summary.overview, "Tools for agents.");
        assert_eq!(summary.importance.level, ImportanceLevel::Low);
    }

    #[test]
    fn test_api_error_propagates() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _| Err(CollectorError::Llm("429 rate limited".to_string())));

        let err = LlmSummarizer::new(client, "English")
            .summarize(&article())
            .unwrap_err();
        assert!(matches!(err, CollectorError::Llm(_)));
    }

    #[test]
    fn test_unexpected_reply_is_malformed() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _| Ok("I cannot help with that.".to_string()));

        let err = LlmSummarizer::new(client, "English")
            .summarize(&article())
            .unwrap_err();
        assert!(matches!(err, CollectorError::MalformedSummary(_)));
    }
}
