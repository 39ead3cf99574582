//! OpenAlex works API

use async_trait::async_trait;
use serde_json::Value;

use super::normalize::{
    array_field, cap_authors, clean_abstract, date_from_year, doi_url, first_non_empty,
    normalize_date, opt_str, reconstruct_inverted_abstract, str_field,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const OPENALEX_API: &str = "https://api.openalex.org/works";
const PAGE_CAP: usize = 100;
const ID: &str = "openalex";

pub struct OpenAlexSource {
    http: reqwest::Client,
    mailto: String,
}

impl OpenAlexSource {
    pub fn new(http: reqwest::Client, mailto: String) -> Self {
        Self { http, mailto }
    }
}

/// 发表日期过滤参数
pub fn date_filter(date_from: Option<&str>, date_to: Option<&str>) -> Option<String> {
    let parts: Vec<String> = [
        date_from.map(|d| format!("from_publication_date:{}", d)),
        date_to.map(|d| format!("to_publication_date:{}", d)),
    ]
    .into_iter()
    .flatten()
    .collect();

    (!parts.is_empty()).then(|| parts.join(","))
}

#[async_trait]
impl Source for OpenAlexSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let mut params = vec![
            ("search", request.query.clone()),
            ("per-page", request.max_results.min(PAGE_CAP).to_string()),
            ("sort", "publication_date:desc".to_string()),
            ("mailto", self.mailto.clone()),
        ];
        if let Some(filter) = date_filter(request.date_from.as_deref(), request.date_to.as_deref())
        {
            params.push(("filter", filter));
        }

        let http_request = self.http.get(OPENALEX_API).query(&params);
        let data = fetch_json(ID, http_request, &RateLimitPolicy::default()).await?;
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

    let authors = cap_authors(
        array_field(work, "authorships")
            .iter()
            .map(|a| str_field(a.get("author").unwrap_or(&Value::Null), "display_name")),
    );

    let published_date = match opt_str(work, "publication_date") {
        Some(date) => normalize_date(&date),
        None => date_from_year(work.get("publication_year").unwrap_or(&Value::Null)),
    };

    let url = first_non_empty([
        opt_str(work, "doi").and_then(|doi| doi_url(&doi)),
        opt_str(work, "id"),
    ]);

    let abstract_text = reconstruct_inverted_abstract(work.get("abstract_inverted_index"));

    let mut result = ResearchResult::new(title, ID)
        .with_url(url)
        .with_published_date(published_date)
        .with_authors(authors);
    if !abstract_text.is_empty() {
        result = result.with_abstract(clean_abstract(&abstract_text));
    }
    Some(result)
}
