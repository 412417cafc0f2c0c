use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::JobId;

/// One article extracted from a processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: String,
    pub page: u32,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Optional machine-written summary used for previews.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Base64-encoded crop of the article on its page. The backend sends an
    /// empty string when there is no image.
    #[serde(
        rename = "crop_image_base64",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub crop_image: Option<String>,
    #[serde(default)]
    pub related_articles: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Case-insensitive keyword membership.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        let wanted = keyword.to_lowercase();
        self.keywords.iter().any(|kw| kw.to_lowercase() == wanted)
    }
}

/// Precomputed keyword aggregate delivered with the result. The count is the
/// backend's and may differ from a local recount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSummary {
    pub keyword: String,
    pub count: u32,
}

/// Body of `GET /result/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub job_id: JobId,
    pub pages: u32,
    pub articles: Vec<Article>,
    #[serde(default)]
    pub keywords_summary: Vec<KeywordSummary>,
}

/// One entry of the `POST /search` response. Search runs over every stored
/// article, so hits carry a snippet and a score rather than the full article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub article_id: String,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(
        rename = "crop_image_base64",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub crop_image: Option<String>,
    pub page: u32,
    #[serde(default)]
    pub relevance_score: f64,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

/// Accepts RFC 3339 as well as naive ISO timestamps, which are taken as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
