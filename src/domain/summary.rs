use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{CollectorError, CollectorResult};

pub const OVERVIEW_HEADING: &str = "Overview";
pub const KEY_POINTS_HEADING: &str = "Key Points";
pub const IMPORTANCE_HEADING: &str = "Importance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportanceLevel {
    High,
    Medium,
    Low,
}

impl ImportanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportanceLevel::High => "High",
            ImportanceLevel::Medium => "Medium",
            ImportanceLevel::Low => "Low",
        }
    }
}

impl std::str::FromStr for ImportanceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(ImportanceLevel::High),
            "medium" => Ok(ImportanceLevel::Medium),
            "low" => Ok(ImportanceLevel::Low),
            _ => Err(format!("Unknown importance level: {}", s)),
        }
    }
}

impl fmt::Display for ImportanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Importance {
    pub level: ImportanceLevel,
    pub rationale: String,
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rationale.is_empty() {
            write!(f, "{}", self.level)
        } else {
            write!(f, "{} - {}", self.level, self.rationale)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub overview: String,
    pub key_points: Vec<String>,
    pub importance: Importance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Overview,
    KeyPoints,
    Importance,
    Other,
}

impl Section {
    fn from_heading(heading: &str) -> Self {
        let heading = heading.trim().to_lowercase();
        if heading.starts_with("overview") || heading.starts_with("summary") || heading == "概要" {
            Section::Overview
        } else if heading.starts_with("key points")
            || heading.starts_with("business implications")
            || heading.contains("示唆")
        {
            Section::KeyPoints
        } else if heading.starts_with("importance") || heading == "重要度" {
            Section::Importance
        } else {
            Section::Other
        }
    }
}

impl Summary {
    /// Parse the markdown the summarizer asks for:
    /// `## Overview` prose, `## Key Points` bullets, `## Importance` level line.
    pub fn parse(text: &str) -> CollectorResult<Self> {
        let bullet = Regex::new(r"^(?:[-*•]|\d+[.)])\s+(.*)$").unwrap();

        let mut section = Section::Preamble;
        let mut overview: Vec<String> = Vec::new();
        let mut key_points: Vec<String> = Vec::new();
        let mut importance: Vec<String> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(heading) = line.strip_prefix('#') {
                section = Section::from_heading(heading.trim_start_matches('#'));
                continue;
            }

            match section {
                Section::Overview => overview.push(line.to_string()),
                Section::KeyPoints => {
                    if let Some(caps) = bullet.captures(line) {
                        key_points.push(caps[1].trim().to_string());
                    } else if let Some(last) = key_points.last_mut() {
                        // Wrapped bullet continues on the next line
                        last.push(' ');
                        last.push_str(line);
                    }
                }
                Section::Importance => importance.push(line.to_string()),
                Section::Preamble | Section::Other => {}
            }
        }

        let overview = overview.join(" ");
        if overview.is_empty() {
            return Err(CollectorError::MalformedSummary(
                "missing overview section".to_string(),
            ));
        }

        let importance = Self::parse_importance(&importance.join(" ")).ok_or_else(|| {
            CollectorError::MalformedSummary("missing or unrecognized importance".to_string())
        })?;

        Ok(Self {
            overview,
            key_points,
            importance,
        })
    }

    fn parse_importance(text: &str) -> Option<Importance> {
        // ASCII-letter boundaries: `\b` sees no boundary between "High" and "です"
        let level_regex = Regex::new(r"(?i)(?:^|[^a-z])(high|medium|low)(?:[^a-z]|$)").unwrap();
        let found = level_regex.captures(text)?.get(1)?;
        let level = found.as_str().parse().ok()?;

        let rationale = text[found.end()..]
            .trim_start_matches(|c: char| {
                c.is_whitespace() || matches!(c, '-' | ':' | '：' | '–' | '—' | ')' | '）' | '*')
            })
            .trim()
            .to_string();

        Some(Importance { level, rationale })
    }
}
