//! Crossref REST API

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde_json::Value;

use super::normalize::{
    array_field, cap_authors, collapse_whitespace, doi_url, first_non_empty, join_abstract,
    opt_str, str_field, strip_markup, u64_field,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const CROSSREF_API: &str = "https://api.crossref.org/works";
const PAGE_CAP: usize = 1000;
const SELECT_FIELDS: &str =
    "DOI,title,author,published,issued,abstract,URL,container-title,type,is-referenced-by-count";
const ID: &str = "crossref";

pub struct CrossrefSource {
    http: reqwest::Client,
    mailto: String,
    user_agent: String,
}

impl CrossrefSource {
    pub fn new(http: reqwest::Client, mailto: String, user_agent: String) -> Self {
        Self {
            http,
            mailto,
            user_agent,
        }
    }
}

/// 过滤参数：日期区间，并且只要带摘要的记录
pub fn build_filter(date_from: Option<&str>, date_to: Option<&str>) -> String {
    let mut filters = Vec::new();
    if let Some(from) = date_from {
        filters.push(format!("from-pub-date:{}", from));
    }
    if let Some(to) = date_to {
        filters.push(format!("until-pub-date:{}", to));
    }
    filters.push("has-abstract:true".to_string());
    filters.join(",")
}

#[async_trait]
impl Source for CrossrefSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let params = [
            ("query.bibliographic", request.query.clone()),
            ("rows", request.max_results.min(PAGE_CAP).to_string()),
            ("sort", "relevance".to_string()),
            ("order", "desc".to_string()),
            ("select", SELECT_FIELDS.to_string()),
            (
                "filter",
                build_filter(request.date_from.as_deref(), request.date_to.as_deref()),
            ),
            ("mailto", self.mailto.clone()),
        ];

        let http_request = self
            .http
            .get(CROSSREF_API)
            .query(&params)
            .header(
                USER_AGENT,
                format!("{} (mailto:{})", self.user_agent, self.mailto),
            );

        let data = fetch_json(ID, http_request, &RateLimitPolicy::default()).await?;
        Ok(parse_response(&data))
    }
}

/// 解析检索响应
pub fn parse_response(data: &Value) -> Vec<ResearchResult> {
    let message = data.get("message").unwrap_or(&Value::Null);
    array_field(message, "items")
        .iter()
        .filter_map(parse_item)
        .collect()
}

fn parse_item(item: &Value) -> Option<ResearchResult> {
    let title = array_field(item, "title")
        .first()
        .and_then(Value::as_str)
        .map(collapse_whitespace)
        .filter(|t| !t.is_empty())?;

    let authors = cap_authors(array_field(item, "author").iter().filter_map(|a| {
        let family = str_field(a, "family");
        if family.is_empty() {
            return None;
        }
        Some(format!("{} {}", str_field(a, "given"), family).trim().to_string())
    }));

    let published_date = item
        .get("published")
        .filter(|v| !v.is_null())
        .or_else(|| item.get("issued"))
        .map(date_from_parts)
        .unwrap_or_default();

    let abstract_text = match opt_str(item, "abstract") {
        Some(raw) => collapse_whitespace(&strip_markup(&raw)),
        None => metadata_description(item),
    };

    let url = first_non_empty([
        opt_str(item, "URL"),
        opt_str(item, "DOI").and_then(|doi| doi_url(&doi)),
    ]);

    Some(
        ResearchResult::new(title, ID)
            .with_abstract(abstract_text)
            .with_url(url)
            .with_published_date(published_date)
            .with_authors(authors),
    )
}

/// `date-parts` 形如 `[[2024, 3, 15]]`，缺失的月日补 1
fn date_from_parts(date: &Value) -> String {
    let parts = date
        .get("date-parts")
        .and_then(Value::as_array)
        .and_then(|outer| outer.first())
        .and_then(Value::as_array);

    let Some(parts) = parts else {
        return String::new();
    };
    let Some(year) = parts.first().and_then(Value::as_u64) else {
        return String::new();
    };
    let month = parts.get(1).and_then(Value::as_u64).unwrap_or(1);
    let day = parts.get(2).and_then(Value::as_u64).unwrap_or(1);

    format!("{:04}-{:02}-{:02}", year, month, day)
}

fn metadata_description(item: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(container) = array_field(item, "container-title")
        .first()
        .and_then(Value::as_str)
    {
        parts.push(format!("Published in: {}", container));
    }

    let work_type = str_field(item, "type");
    if !work_type.is_empty() {
        parts.push(format!("Type: {}", title_case_words(&work_type.replace('-', " "))));
    }

    let citations = u64_field(item, "is-referenced-by-count");
    if citations > 0 {
        parts.push(format!("Citations: {}", citations));
    }

    join_abstract(parts)
}

fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests;
