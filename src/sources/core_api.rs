//! CORE v3 API

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::normalize::{
    array_field, cap_authors, clean_abstract, date_from_year, doi_url, first_non_empty,
    join_abstract, normalize_date, opt_str, str_field, u64_field, year_of,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const CORE_API: &str = "https://api.core.ac.uk/v3/search/works/";
const PAGE_CAP: usize = 100;
const ID: &str = "core";

pub struct CoreSource {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl CoreSource {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }
}

/// 在检索语句后追加 `yearPublished` 区间
pub fn build_query(query: &str, date_from: Option<&str>, date_to: Option<&str>) -> String {
    if date_from.is_none() && date_to.is_none() {
        return query.to_string();
    }

    let from_year = year_of(date_from).unwrap_or("1900");
    let to_year = year_of(date_to).unwrap_or("2100");

    if from_year == to_year {
        format!("{} AND yearPublished:{}", query, from_year)
    } else {
        format!(
            "{} AND yearPublished>={} AND yearPublished<={}",
            query, from_year, to_year
        )
    }
}

#[async_trait]
impl Source for CoreSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let params = [
            (
                "q",
                build_query(
                    &request.query,
                    request.date_from.as_deref(),
                    request.date_to.as_deref(),
                ),
            ),
            ("limit", request.max_results.min(PAGE_CAP).to_string()),
        ];

        let mut http_request = self.http.get(CORE_API).query(&params);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let policy = RateLimitPolicy {
            statuses: &[StatusCode::TOO_MANY_REQUESTS],
            hint: "Consider setting CORE_API_KEY environment variable for higher limits.",
        };
        let data = fetch_json(ID, http_request, &policy).await?;
        Ok(parse_response(&data))
    }
}

/// 解析检索响应
pub fn parse_response(data: &Value) -> Vec<ResearchResult> {
    array_field(data, "results")
        .iter()
        .filter_map(parse_work)
        .collect()
}

fn parse_work(work: &Value) -> Option<ResearchResult> {
    let title = opt_str(work, "title")?;

    // 作者可能是对象也可能是字符串
    let authors = cap_authors(array_field(work, "authors").iter().map(|a| match a {
        Value::String(name) => name.clone(),
        other => str_field(other, "name"),
    }));

    let published_date = match opt_str(work, "publishedDate") {
        Some(date) => normalize_date(&date),
        None => date_from_year(work.get("yearPublished").unwrap_or(&Value::Null)),
    };

    let abstract_text = match opt_str(work, "abstract") {
        Some(text) => clean_abstract(&text),
        None => metadata_description(work),
    };

    let url = first_non_empty([
        opt_str(work, "doi").and_then(|doi| doi_url(&doi)),
        opt_str(work, "downloadUrl"),
        opt_str(work, "id").map(|id| format!("https://core.ac.uk/works/{}", id)),
    ]);

    Some(
        ResearchResult::new(title, ID)
            .with_abstract(abstract_text)
            .with_url(url)
            .with_published_date(published_date)
            .with_authors(authors),
    )
}

fn metadata_description(work: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(doc_type) = opt_str(work, "documentType") {
        parts.push(format!("Type: {}", doc_type));
    }
    if let Some(provider) = array_field(work, "dataProviders")
        .first()
        .and_then(|p| opt_str(p, "name"))
    {
        parts.push(format!("Repository: {}", provider));
    }
    let citations = u64_field(work, "citationCount");
    if citations > 0 {
        parts.push(format!("Citations: {}", citations));
    }

    join_abstract(parts)
}

#[cfg(test)]
mod tests;
