//! GitHub 仓库检索

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;

use super::normalize::{
    array_field, clean_abstract, join_abstract, normalize_date, opt_str, truncate_chars,
    u64_field,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json};
use crate::types::ResearchResult;

const GITHUB_SEARCH_API: &str = "https://api.github.com/search/repositories";
const PAGE_CAP: usize = 100;
const DESCRIPTION_CHARS: usize = 300;
const ID: &str = "github";

pub struct GithubSource {
    http: reqwest::Client,
    token: Option<String>,
}

impl GithubSource {
    pub fn new(http: reqwest::Client, token: Option<String>) -> Self {
        Self { http, token }
    }
}

/// 追加 `pushed:` 限定符
pub fn build_query(query: &str, date_from: Option<&str>, date_to: Option<&str>) -> String {
    match (date_from, date_to) {
        (Some(from), Some(to)) => format!("{} pushed:{}..{}", query, from, to),
        (Some(from), None) => format!("{} pushed:>={}", query, from),
        (None, Some(to)) => format!("{} pushed:<={}", query, to),
        (None, None) => query.to_string(),
    }
}

#[async_trait]
impl Source for GithubSource {
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
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", request.max_results.min(PAGE_CAP).to_string()),
        ];

        let mut http_request = self
            .http
            .get(GITHUB_SEARCH_API)
            .query(&params)
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            http_request = http_request.bearer_auth(token);
        }

        // GitHub 限流时返回 403
        let policy = RateLimitPolicy {
            statuses: &[StatusCode::FORBIDDEN, StatusCode::TOO_MANY_REQUESTS],
            hint: "Set GITHUB_TOKEN env var for higher limits.",
        };
        let data = fetch_json(ID, http_request, &policy).await?;
        Ok(parse_response(&data))
    }
}

/// 解析检索响应
pub fn parse_response(data: &Value) -> Vec<ResearchResult> {
    array_field(data, "items")
        .iter()
        .filter_map(parse_repo)
        .collect()
}

fn parse_repo(repo: &Value) -> Option<ResearchResult> {
    let name = opt_str(repo, "name")?;
    let title = opt_str(repo, "full_name").unwrap_or(name);

    let mut parts = Vec::new();
    if let Some(description) = opt_str(repo, "description") {
        parts.push(truncate_chars(&description, DESCRIPTION_CHARS));
    }

    let mut meta = Vec::new();
    let stars = u64_field(repo, "stargazers_count");
    if stars > 0 {
        meta.push(format!("Stars: {}", thousands(stars)));
    }
    let forks = u64_field(repo, "forks_count");
    if forks > 0 {
        meta.push(format!("Forks: {}", thousands(forks)));
    }
    if let Some(language) = opt_str(repo, "language") {
        meta.push(format!("Language: {}", language));
    }
    if !meta.is_empty() {
        parts.push(meta.join(" | "));
    }

    let topics: Vec<&str> = array_field(repo, "topics")
        .iter()
        .filter_map(Value::as_str)
        .take(5)
        .collect();
    if !topics.is_empty() {
        parts.push(format!("Topics: {}", topics.join(", ")));
    }

    let authors = repo
        .get("owner")
        .and_then(|owner| opt_str(owner, "login"))
        .map(|login| vec![login])
        .unwrap_or_default();

    Some(
        ResearchResult::new(title, ID)
            .with_abstract(clean_abstract(&join_abstract(parts)))
            .with_url(opt_str(repo, "html_url").unwrap_or_default())
            .with_published_date(normalize_date(&opt_str(repo, "updated_at").unwrap_or_default()))
            .with_authors(authors),
    )
}

/// 千分位格式化
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
