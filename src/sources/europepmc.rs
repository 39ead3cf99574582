//! Europe PMC REST API

use async_trait::async_trait;
use serde_json::Value;

use super::normalize::{
    array_field, cap_authors, clean_abstract, date_from_year, doi_url, first_non_empty,
    join_abstract, opt_str, strip_markup, year_of,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const EUROPEPMC_API: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/search";
const PAGE_CAP: usize = 1000;
const ID: &str = "europepmc";

pub struct EuropePmcSource {
    http: reqwest::Client,
}

impl EuropePmcSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

/// 追加 `FIRST_PDATE` 年份区间，3000 表示至今
pub fn build_query(query: &str, date_from: Option<&str>, date_to: Option<&str>) -> String {
    if date_from.is_none() && date_to.is_none() {
        return query.to_string();
    }
    let from_year = year_of(date_from).unwrap_or("1900");
    let to_year = year_of(date_to).unwrap_or("3000");
    format!("{} FIRST_PDATE:[{} TO {}]", query, from_year, to_year)
}

#[async_trait]
impl Source for EuropePmcSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let params = [
            (
                "query",
                build_query(
                    &request.query,
                    request.date_from.as_deref(),
                    request.date_to.as_deref(),
                ),
            ),
            ("format", "json".to_string()),
            ("pageSize", request.max_results.min(PAGE_CAP).to_string()),
            ("resultType", "core".to_string()),
        ];

        let http_request = self.http.get(EUROPEPMC_API).query(&params);
        let data = fetch_json(ID, http_request, &RateLimitPolicy::default()).await?;
        Ok(parse_response(&data))
    }
}

/// 解析检索响应
pub fn parse_response(data: &Value) -> Vec<ResearchResult> {
    let result_list = data.get("resultList").unwrap_or(&Value::Null);
    array_field(result_list, "result")
        .iter()
        .filter_map(parse_item)
        .collect()
}

fn parse_item(item: &Value) -> Option<ResearchResult> {
    let title = opt_str(item, "title")?;

    let authors = cap_authors(
        opt_str(item, "authorString")
            .map(|s| {
                s.trim_end_matches('.')
                    .split(',')
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default(),
    );

    let abstract_text = match opt_str(item, "abstractText") {
        Some(text) => clean_abstract(&strip_markup(&text)),
        None => metadata_description(item),
    };

    Some(
        ResearchResult::new(title, ID)
            .with_abstract(abstract_text)
            .with_url(resolve_url(item))
            .with_published_date(date_from_year(item.get("pubYear").unwrap_or(&Value::Null)))
            .with_authors(authors),
    )
}

/// 链接优先级：DOI → 全文链接 → PMID → 记录ID
fn resolve_url(item: &Value) -> String {
    let full_text = item
        .get("fullTextUrlList")
        .map(|list| array_field(list, "fullTextUrl"))
        .and_then(|urls| urls.first())
        .and_then(|u| opt_str(u, "url"));

    let record = opt_str(item, "id").map(|id| {
        let source = opt_str(item, "source").unwrap_or_else(|| "MED".to_string());
        format!("https://europepmc.org/article/{}/{}", source, id)
    });

    first_non_empty([
        opt_str(item, "doi").and_then(|doi| doi_url(&doi)),
        full_text,
        opt_str(item, "pmid").map(|pmid| format!("https://europepmc.org/article/MED/{}", pmid)),
        record,
    ])
}

fn metadata_description(item: &Value) -> String {
    let mut parts = Vec::new();

    let journal_title = item
        .get("journalInfo")
        .and_then(|info| info.get("journal"))
        .and_then(|journal| opt_str(journal, "title"));
    if let Some(journal) = journal_title {
        parts.push(format!("Journal: {}", journal));
    }

    let pub_types: Vec<&str> = item
        .get("pubTypeList")
        .map(|list| array_field(list, "pubType"))
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_str)
        .take(3)
        .collect();
    if !pub_types.is_empty() {
        parts.push(format!("Type: {}", pub_types.join(", ")));
    }

    let access = if opt_str(item, "isOpenAccess").as_deref() == Some("Y") {
        "Open Access"
    } else {
        "Closed Access"
    };
    parts.push(format!("Access: {}", access));

    join_abstract(parts)
}

#[cfg(test)]
mod tests;
