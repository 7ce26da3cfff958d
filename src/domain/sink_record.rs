use chrono::{FixedOffset, NaiveDate};
use notion::{Block, CreatePage, PropertyValue};

use super::summary::{IMPORTANCE_HEADING, KEY_POINTS_HEADING, OVERVIEW_HEADING};
use super::{Article, Summary};

/// Longest page title written to the database
pub const MAX_TITLE_CHARS: usize = 200;

/// One database page per processed article
#[derive(Debug, Clone, PartialEq)]
pub struct SinkRecord {
    pub title: String,
    pub source: String,
    pub tag: String,
    pub url: String,
    pub published: Option<NaiveDate>,
    pub body: Vec<Block>,
}

impl SinkRecord {
    /// `offset` is the timezone the published date is reported in
    pub fn from_article(article: &Article, summary: &Summary, offset: &FixedOffset) -> Self {
        let mut body = vec![
            Block::heading_2(OVERVIEW_HEADING),
            Block::paragraph(&summary.overview),
        ];

        if !summary.key_points.is_empty() {
            body.push(Block::heading_2(KEY_POINTS_HEADING));
            body.extend(summary.key_points.iter().map(|p| Block::bulleted_list_item(p)));
        }

        body.push(Block::heading_2(IMPORTANCE_HEADING));
        body.push(Block::paragraph(&summary.importance.to_string()));

        Self {
            title: article.title.chars().take(MAX_TITLE_CHARS).collect(),
            source: article.source.clone(),
            tag: article.tag.clone(),
            url: article.url.clone(),
            published: article
                .published
                .map(|dt| dt.with_timezone(offset).date_naive()),
            body,
        }
    }

    pub fn to_page(&self, database_id: &str) -> CreatePage {
        let mut page = CreatePage::new(database_id)
            .property("Name", PropertyValue::title(&self.title))
            .property("Source", PropertyValue::select(&self.source))
            .property("Tag", PropertyValue::select(&self.tag))
            .property("URL", PropertyValue::url(&self.url));

        if let Some(date) = self.published {
            page = page.property(
                "Published",
                PropertyValue::date(&date.format("%Y-%m-%d").to_string()),
            );
        }

        page.children(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::domain::{Importance, ImportanceLevel};
    use chrono::{TimeZone, Utc};

    fn article() -> Article {
        let source = SourceConfig::feed("OpenAI Blog", "OpenAI", "https://openai.com/blog/rss.xml");
        Article::new(
            &source,
            "Introducing agents".to_string(),
            "https://openai.com/index/agents".to_string(),
        )
        // 20:00 UTC is already the next day in JST
        .with_published(Some(Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()))
    }

    fn summary() -> Summary {
        Summary {
            overview: "Agents are here.".to_string(),
            key_points: vec!["Support teams".to_string(), "Start small".to_string()],
            importance: Importance {
                level: ImportanceLevel::High,
                rationale: "Broad enterprise impact".to_string(),
            },
        }
    }

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_published_date_in_offset() {
        let record = SinkRecord::from_article(&article(), &summary(), &jst());
        assert_eq!(record.published, NaiveDate::from_ymd_opt(2024, 3, 2));
    }

    #[test]
    fn test_body_layout() {
        let record = SinkRecord::from_article(&article(), &summary(), &jst());
        let texts: Vec<&str> = record.body.iter().map(|b| b.text()).collect();

        assert_eq!(
            texts,
            vec![
                "Overview",
                "Agents are here.",
                "Key Points",
                "Support teams",
                "Start small",
                "Importance",
                "High - Broad enterprise impact",
            ]
        );
        assert_eq!(record.body[3].kind, "bulleted_list_item");
    }

    #[test]
    fn test_title_truncated() {
        let mut long = article();
        long.title = "t".repeat(300);
        let record = SinkRecord::from_article(&long, &summary(), &jst());
        assert_eq!(record.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_page_properties() {
        let record = SinkRecord::from_article(&article(), &summary(), &jst());
        let page = record.to_page("db-1");

        assert_eq!(page.parent.database_id, "db-1");
        assert_eq!(page.properties["Source"], PropertyValue::select("OpenAI Blog"));
        assert_eq!(page.properties["Tag"], PropertyValue::select("OpenAI"));
        assert_eq!(page.properties["Published"], PropertyValue::date("2024-03-02"));
        assert_eq!(page.children.len(), 7);
    }

    #[test]
    fn test_undated_article_has_no_published_property() {
        let mut undated = article();
        undated.published = None;
        let page = SinkRecord::from_article(&undated, &summary(), &jst()).to_page("db");
        assert!(!page.properties.contains_key("Published"));
    }
}
