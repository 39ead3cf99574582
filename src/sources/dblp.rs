//! DBLP 计算机科学文献检索

use async_trait::async_trait;
use serde_json::Value;

use super::normalize::{
    cap_authors, date_from_year, doi_url, first_non_empty, join_abstract, opt_str, str_field,
    within_date_range,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const DBLP_API: &str = "https://dblp.org/search/publ/api";
const PAGE_CAP: usize = 1000;
const ID: &str = "dblp";

pub struct DblpSource {
    http: reqwest::Client,
}

impl DblpSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Source for DblpSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let params = [
            ("q", request.query.clone()),
            ("format", "json".to_string()),
            ("h", request.max_results.min(PAGE_CAP).to_string()),
        ];

        let http_request = self.http.get(DBLP_API).query(&params);
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
    let hits = data
        .pointer("/result/hits/hit")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    hits.iter()
        .filter_map(|hit| hit.get("info"))
        .filter_map(parse_info)
        .collect()
}

fn parse_info(info: &Value) -> Option<ResearchResult> {
    let title = opt_str(info, "title")?;

    // 单个作者时返回对象而不是数组
    let authors = match info.pointer("/authors/author") {
        Some(Value::Array(list)) => list.iter().map(|a| str_field(a, "text")).collect(),
        Some(single @ Value::Object(_)) => vec![str_field(single, "text")],
        _ => Vec::new(),
    };

    let url = first_non_empty([
        opt_str(info, "doi").and_then(|doi| doi_url(&doi)),
        text_or_first(info.get("ee")),
        opt_str(info, "url"),
    ]);

    Some(
        ResearchResult::new(title, ID)
            .with_abstract(metadata_description(info))
            .with_url(url)
            .with_published_date(date_from_year(info.get("year").unwrap_or(&Value::Null)))
            .with_authors(cap_authors(authors)),
    )
}

/// DBLP 不提供摘要，用出版信息拼接描述
fn metadata_description(info: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(venue) = text_or_first(info.get("venue")) {
        parts.push(format!("Published in: {}", venue));
    }
    if let Some(kind) = opt_str(info, "type") {
        parts.push(format!("Type: {}", kind));
    }
    if let Some(pages) = opt_str(info, "pages") {
        parts.push(format!("Pages: {}", pages));
    }
    if let Some(access) = opt_str(info, "access") {
        let label = if access == "open" {
            "Open Access"
        } else {
            "Closed Access"
        };
        parts.push(format!("Access: {}", label));
    }

    join_abstract(parts)
}

fn text_or_first(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty()),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
