//! DuckDuckGo 网页与新闻检索
//!
//! 两者都没有日期语义，请求中的日期字段被忽略。

use async_trait::async_trait;
use chrono::DateTime;
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

use super::normalize::{
    array_field, collapse_whitespace, normalize_date, opt_str, strip_markup,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_json, fetch_text};
use crate::types::ResearchResult;

const DDG_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const DDG_ENDPOINT: &str = "https://duckduckgo.com/";
const DDG_NEWS_ENDPOINT: &str = "https://duckduckgo.com/news.js";
const WEB_ID: &str = "web";
const NEWS_ID: &str = "news";

static VQD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"vqd=["']?([\d-]+)["']?"#).expect("valid regex"));

pub struct WebSource {
    http: reqwest::Client,
}

impl WebSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Source for WebSource {
    fn id(&self) -> &str {
        WEB_ID
    }

    fn supports_date_filter(&self) -> bool {
        false
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let http_request = self
            .http
            .post(DDG_HTML_ENDPOINT)
            .form(&[("q", request.query.as_str())])
            .header("Accept", "text/html");

        let html = fetch_text(WEB_ID, http_request, &RateLimitPolicy::default()).await?;
        let mut results = parse_html(&html).map_err(|e| SourceError::parse(WEB_ID, e))?;
        results.truncate(request.max_results);
        Ok(results)
    }
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector {}: {}", css, e))
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// 解析 DuckDuckGo HTML 结果页，广告条目被跳过
pub fn parse_html(html: &str) -> Result<Vec<ResearchResult>, String> {
    let document = Html::parse_document(html);
    let result_sel = selector(".result")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector("a.result__snippet, .result__snippet")?;

    let mut results = Vec::new();
    for block in document.select(&result_sel) {
        let is_ad = block
            .value()
            .attr("class")
            .is_some_and(|class| class.contains("result--ad"));
        if is_ad {
            continue;
        }

        let Some(link) = block.select(&link_sel).next() else {
            continue;
        };
        let title = element_text(&link);
        if title.is_empty() {
            continue;
        }

        let url = link
            .value()
            .attr("href")
            .map(extract_ddg_url)
            .unwrap_or_default();
        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|s| element_text(&s))
            .unwrap_or_default();

        let mut result = ResearchResult::new(title, WEB_ID).with_url(url);
        if !snippet.is_empty() {
            result = result.with_abstract(snippet);
        }
        results.push(result);
    }

    Ok(results)
}

/// 还原 DuckDuckGo 跳转链接中的真实地址
///
/// 形如 `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`。
pub fn extract_ddg_url(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + "uddg=".len();
        let end = href[start..]
            .find('&')
            .map(|i| start + i)
            .unwrap_or(href.len());
        let encoded = &href[start..end];
        if !encoded.is_empty() {
            return percent_decode_str(encoded)
                .decode_utf8_lossy()
                .into_owned();
        }
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    href.to_string()
}

pub struct NewsSource {
    http: reqwest::Client,
}

impl NewsSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// 新闻接口需要先从搜索页获取 vqd 令牌
    async fn fetch_vqd(&self, query: &str) -> Result<String, SourceError> {
        let http_request = self.http.get(DDG_ENDPOINT).query(&[("q", query)]);
        let page = fetch_text(NEWS_ID, http_request, &RateLimitPolicy::default()).await?;
        extract_vqd(&page)
            .ok_or_else(|| SourceError::parse(NEWS_ID, "vqd token not found in search page"))
    }
}

/// 从搜索页中提取 vqd 令牌
pub fn extract_vqd(page: &str) -> Option<String> {
    VQD_TOKEN
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[async_trait]
impl Source for NewsSource {
    fn id(&self) -> &str {
        NEWS_ID
    }

    fn supports_date_filter(&self) -> bool {
        false
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let vqd = self.fetch_vqd(&request.query).await?;

        let http_request = self.http.get(DDG_NEWS_ENDPOINT).query(&[
            ("l", "us-en"),
            ("o", "json"),
            ("noamp", "1"),
            ("q", request.query.as_str()),
            ("vqd", vqd.as_str()),
            ("p", "-1"),
        ]);

        let data = fetch_json(NEWS_ID, http_request, &RateLimitPolicy::default()).await?;
        let mut results = parse_news(&data);
        results.truncate(request.max_results);
        Ok(results)
    }
}

/// 解析新闻 JSON，发布时间为 unix 秒
pub fn parse_news(data: &Value) -> Vec<ResearchResult> {
    array_field(data, "results")
        .iter()
        .filter_map(|item| {
            let title = collapse_whitespace(&strip_markup(&opt_str(item, "title")?));
            if title.is_empty() {
                return None;
            }

            let published_date = match item.get("date") {
                Some(Value::Number(n)) => n
                    .as_i64()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .map(|dt| dt.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                Some(Value::String(s)) => normalize_date(s),
                _ => String::new(),
            };

            let outlet = opt_str(item, "source").unwrap_or_else(|| "Unknown".to_string());

            let mut result = ResearchResult::new(title, NEWS_ID)
                .with_url(opt_str(item, "url").unwrap_or_default())
                .with_published_date(published_date)
                .with_authors(vec![outlet]);
            if let Some(excerpt) = opt_str(item, "excerpt") {
                result = result.with_abstract(collapse_whitespace(&strip_markup(&excerpt)));
            }
            Some(result)
        })
        .collect()
}

#[cfg(test)]
mod tests;
