//! Semantic Scholar Graph API

use async_trait::async_trait;
use serde_json::Value;

use super::normalize::{
    array_field, cap_authors, clean_abstract, date_from_year, doi_url, first_non_empty, opt_str,
    str_field, year_of,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const FIELDS: &str = "title,abstract,url,authors,year,externalIds";
const PAGE_CAP: usize = 100;
const ID: &str = "semantic_scholar";

pub struct SemanticScholarSource {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl SemanticScholarSource {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }
}

/// 服务端年份区间参数，只有起始日期时截止年份放宽到 2099
pub fn year_range(date_from: Option<&str>, date_to: Option<&str>) -> Option<String> {
    let from = year_of(date_from)?;
    let to = year_of(date_to).unwrap_or("2099");
    Some(format!("{}-{}", from, to))
}

#[async_trait]
impl Source for SemanticScholarSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let mut params = vec![
            ("query", request.query.clone()),
            ("limit", request.max_results.min(PAGE_CAP).to_string()),
            ("fields", FIELDS.to_string()),
        ];
        if let Some(years) = year_range(request.date_from.as_deref(), request.date_to.as_deref())
        {
            params.push(("year", years));
        }

        let mut http_request = self.http.get(SEMANTIC_SCHOLAR_API).query(&params);
        if let Some(key) = &self.api_key {
            http_request = http_request.header("x-api-key", key);
        }

        let data = fetch_json(ID, http_request, &RateLimitPolicy::default()).await?;
        Ok(parse_response(&data))
    }
}

/// 解析检索响应
pub fn parse_response(data: &Value) -> Vec<ResearchResult> {
    array_field(data, "data")
        .iter()
        .filter_map(parse_paper)
        .collect()
}

fn parse_paper(paper: &Value) -> Option<ResearchResult> {
    let title = opt_str(paper, "title")?;

    let authors = cap_authors(
        array_field(paper, "authors")
            .iter()
            .map(|a| str_field(a, "name")),
    );

    let external_ids = paper.get("externalIds").unwrap_or(&Value::Null);
    let url = first_non_empty([
        opt_str(paper, "url"),
        opt_str(external_ids, "DOI").and_then(|doi| doi_url(&doi)),
        opt_str(external_ids, "ArXiv").map(|id| format!("https://arxiv.org/abs/{}", id)),
    ]);

    let mut result = ResearchResult::new(title, ID)
        .with_url(url)
        .with_published_date(date_from_year(paper.get("year").unwrap_or(&Value::Null)))
        .with_authors(authors);
    if let Some(text) = opt_str(paper, "abstract") {
        result = result.with_abstract(clean_abstract(&text));
    }
    Some(result)
}
