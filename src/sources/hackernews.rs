//! Hacker News（Algolia 检索接口）

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;

use super::normalize::{array_field, clean_abstract, opt_str, truncate_chars, u64_field};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const HN_SEARCH_API: &str = "https://hn.algolia.com/api/v1/search";
const PAGE_CAP: usize = 50;
const STORY_TEXT_CHARS: usize = 500;
const ID: &str = "hackernews";

pub struct HackerNewsSource {
    http: reqwest::Client,
}

impl HackerNewsSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Source for HackerNewsSource {
    fn id(&self) -> &str {
        ID
    }

    fn supports_date_filter(&self) -> bool {
        false
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let params = [
            ("query", request.query.clone()),
            ("tags", "story".to_string()),
            ("hitsPerPage", request.max_results.min(PAGE_CAP).to_string()),
        ];

        let http_request = self.http.get(HN_SEARCH_API).query(&params);
        let data = fetch_json(ID, http_request, &RateLimitPolicy::default()).await?;
        Ok(parse_response(&data))
    }
}

/// 解析检索响应
pub fn parse_response(data: &Value) -> Vec<ResearchResult> {
    array_field(data, "hits")
        .iter()
        .filter_map(parse_hit)
        .collect()
}

fn parse_hit(hit: &Value) -> Option<ResearchResult> {
    let title = opt_str(hit, "title")?;

    // 没有外链时指向讨论页
    let url = opt_str(hit, "url").unwrap_or_else(|| {
        format!(
            "https://news.ycombinator.com/item?id={}",
            opt_str(hit, "objectID").unwrap_or_default()
        )
    });

    let published_date = opt_str(hit, "created_at")
        .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let abstract_text = match opt_str(hit, "story_text") {
        Some(text) => clean_abstract(&truncate_chars(&text, STORY_TEXT_CHARS)),
        None => format!(
            "{} points, {} comments on HN",
            u64_field(hit, "points"),
            u64_field(hit, "num_comments")
        ),
    };

    let author = opt_str(hit, "author").unwrap_or_else(|| "Unknown".to_string());

    Some(
        ResearchResult::new(title, ID)
            .with_abstract(abstract_text)
            .with_url(url)
            .with_published_date(published_date)
            .with_authors(vec![author]),
    )
}

#[cfg(test)]
mod tests;
