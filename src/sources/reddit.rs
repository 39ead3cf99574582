//! Reddit 公开检索接口

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use serde_json::Value;

use super::normalize::{
    array_field, clean_abstract, join_abstract, opt_str, truncate_chars, u64_field,
    within_date_range,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const REDDIT_SEARCH_API: &str = "https://www.reddit.com/search.json";
const PAGE_CAP: usize = 100;
const SELFTEXT_CHARS: usize = 500;
const ID: &str = "reddit";

pub struct RedditSource {
    http: reqwest::Client,
}

impl RedditSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

/// 把起始日期映射为 Reddit 的粗粒度时间窗口
pub fn time_window(date_from: Option<&str>, today: NaiveDate) -> &'static str {
    let Some(from) = date_from else {
        return "year";
    };
    let Ok(from) = NaiveDate::parse_from_str(from, "%Y-%m-%d") else {
        return "year";
    };

    match (today - from).num_days() {
        days if days <= 1 => "day",
        days if days <= 7 => "week",
        days if days <= 30 => "month",
        days if days <= 365 => "year",
        _ => "all",
    }
}

#[async_trait]
impl Source for RedditSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let window = time_window(request.date_from.as_deref(), Local::now().date_naive());
        let params = [
            ("q", request.query.clone()),
            ("sort", "relevance".to_string()),
            ("limit", request.max_results.min(PAGE_CAP).to_string()),
            ("type", "link".to_string()),
            ("t", window.to_string()),
        ];

        let http_request = self.http.get(REDDIT_SEARCH_API).query(&params);
        let data = fetch_json(ID, http_request, &RateLimitPolicy::default()).await?;

        Ok(parse_response(&data)
            .into_iter()
            .filter(|r| {
                within_date_range(
                    &r.published_date,
                    request.date_from.as_deref(),
                    request.date_to.as_deref(),
                )
            })
            .collect())
    }
}

/// 解析检索响应
pub fn parse_response(data: &Value) -> Vec<ResearchResult> {
    let listing = data.get("data").unwrap_or(&Value::Null);
    array_field(listing, "children")
        .iter()
        .filter_map(|child| child.get("data"))
        .filter_map(parse_post)
        .collect()
}

fn parse_post(post: &Value) -> Option<ResearchResult> {
    let title = opt_str(post, "title")?;

    let published_date = post
        .get("created_utc")
        .and_then(Value::as_f64)
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let mut parts = Vec::new();
    if let Some(subreddit) = opt_str(post, "subreddit") {
        parts.push(format!("r/{}", subreddit));
    }
    parts.push(format!(
        "Score: {} | Comments: {}",
        post.get("score").and_then(Value::as_i64).unwrap_or(0),
        u64_field(post, "num_comments")
    ));
    if let Some(selftext) = opt_str(post, "selftext") {
        parts.push(truncate_chars(&selftext, SELFTEXT_CHARS));
    }

    let url = match opt_str(post, "permalink") {
        Some(permalink) => format!("https://www.reddit.com{}", permalink),
        None => opt_str(post, "url").unwrap_or_default(),
    };

    let authors = opt_str(post, "author")
        .filter(|a| a != "[deleted]")
        .map(|a| vec![format!("u/{}", a)])
        .unwrap_or_default();

    Some(
        ResearchResult::new(title, ID)
            .with_abstract(clean_abstract(&join_abstract(parts)))
            .with_url(url)
            .with_published_date(published_date)
            .with_authors(authors),
    )
}
