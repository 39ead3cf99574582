//! arXiv Atom API

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::sync::LazyLock;

use super::normalize::{
    cap_authors, clean_abstract, collapse_whitespace, normalize_date, within_date_range,
};
use super::{RateLimitPolicy, SearchRequest, Source, SourceError, fetch_text};
use crate::types::ResearchResult;

const ARXIV_API: &str = "http://export.arxiv.org/api/query";
const PAGE_CAP: usize = 2000;
const ID: &str = "arxiv";

static QUERY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"-?"[^"]+"|\S+"#).expect("valid regex"));

pub struct ArxivSource {
    http: reqwest::Client,
}

impl ArxivSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError> {
        let search_query = build_search_query(&request.query);
        let max_results = request.max_results.min(PAGE_CAP).to_string();

        let http_request = self.http.get(ARXIV_API).query(&[
            ("search_query", search_query.as_str()),
            ("start", "0"),
            ("max_results", max_results.as_str()),
            ("sortBy", "submittedDate"),
            ("sortOrder", "descending"),
        ]);

        let body = fetch_text(ID, http_request, &RateLimitPolicy::default()).await?;
        let results = parse_feed(&body).map_err(|e| SourceError::parse(ID, e))?;

        Ok(results
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

/// 把自由文本检索语句转换为 arXiv 查询语法
///
/// 普通词用 `AND` 连接，`-词` 转为 `ANDNOT`，`OR` 保留为运算符，引号短语整体匹配。
pub fn build_search_query(query: &str) -> String {
    let mut clause = String::new();
    let mut excluded = Vec::new();
    let mut pending_or = false;

    for token in QUERY_TOKEN.find_iter(query).map(|m| m.as_str()) {
        if token == "OR" {
            pending_or = !clause.is_empty();
            continue;
        }
        if token == "AND" {
            continue;
        }

        let (negated, term) = match token.strip_prefix('-') {
            Some(rest) if !rest.is_empty() => (true, rest),
            _ => (false, token),
        };
        let term = term.trim_matches('"').trim();
        if term.is_empty() {
            continue;
        }

        let field = if term.contains(' ') {
            format!("all:\"{}\"", term)
        } else {
            format!("all:{}", term)
        };

        if negated {
            excluded.push(field);
        } else if clause.is_empty() {
            clause = field;
        } else {
            let op = if pending_or { "OR" } else { "AND" };
            clause = format!("{} {} {}", clause, op, field);
        }
        pending_or = false;
    }

    if clause.is_empty() {
        return format!("all:{}", query.trim());
    }
    for field in excluded {
        clause = format!("{} ANDNOT {}", clause, field);
    }
    clause
}

#[derive(Default)]
struct EntryDraft {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    author_name: String,
}

impl EntryDraft {
    fn finish(self) -> Option<ResearchResult> {
        let title = collapse_whitespace(&self.title);
        if title.is_empty() || self.id.contains("/api/errors") {
            return None;
        }
        let summary = clean_abstract(&collapse_whitespace(&self.summary));

        let mut result = ResearchResult::new(title, ID)
            .with_url(self.id.trim())
            .with_published_date(normalize_date(&self.published))
            .with_authors(cap_authors(self.authors));
        if !summary.is_empty() {
            result = result.with_abstract(summary);
        }
        Some(result)
    }
}

/// 解析 Atom 响应
pub fn parse_feed(xml: &str) -> Result<Vec<ResearchResult>, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut entry: Option<EntryDraft> = None;
    let mut results = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"entry" {
                    entry = Some(EntryDraft::default());
                }
                path.push(name);
            }
            Ok(Event::Text(t)) => {
                if let Some(draft) = entry.as_mut() {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    match path.last().map(Vec::as_slice) {
                        Some(b"title") => draft.title.push_str(&text),
                        Some(b"summary") => draft.summary.push_str(&text),
                        Some(b"id") => draft.id.push_str(&text),
                        Some(b"published") => draft.published.push_str(&text),
                        Some(b"name") => draft.author_name.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name().as_ref().to_vec();
                path.pop();
                if name == b"author" {
                    if let Some(draft) = entry.as_mut() {
                        let author = std::mem::take(&mut draft.author_name);
                        draft.authors.push(author);
                    }
                } else if name == b"entry" {
                    if let Some(result) = entry.take().and_then(EntryDraft::finish) {
                        results.push(result);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "Atom parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(results)
}
