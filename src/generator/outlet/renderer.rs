//! 把调研报告渲染为 Markdown

use crate::types::{ResearchReport, ResearchResult};

/// 报告中单条结果最多列出的作者数
const MAX_LISTED_AUTHORS: usize = 5;

/// 数据源标识对应的分组标题，未知标识按单词首字母大写
pub fn source_label(source: &str) -> String {
    let label = match source {
        "arxiv" => "arXiv Papers",
        "semantic_scholar" => "Semantic Scholar Papers",
        "openalex" => "OpenAlex Works",
        "crossref" => "Crossref Publications",
        "core" => "CORE Open Access Papers",
        "europepmc" => "Europe PMC Publications",
        "dblp" => "DBLP Computer Science Publications",
        "web" => "Web Articles",
        "news" => "News Articles",
        "hackernews" => "Hacker News Discussions",
        "reddit" => "Reddit Discussions",
        "github" => "GitHub Repositories",
        other => return title_case(other),
    };
    label.to_string()
}

/// 每个字母段的首字母大写、其余小写，非字母字符作为分隔
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Markdown 渲染器，`model` 写入页脚
pub struct MarkdownRenderer<'a> {
    model: &'a str,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(model: &'a str) -> Self {
        Self { model }
    }

    pub fn render(&self, report: &ResearchReport) -> String {
        let query = &report.query;
        let mut md = String::new();

        md.push_str(&format!("# Research Report: {}\n\n", query.topic()));
        md.push_str(&format!(
            "**Generated**: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        if let Some(search_query) = query.search_query() {
            if search_query != query.topic() {
                md.push_str(&format!("**Search Query**: {}\n", search_query));
            }
        }
        if query.date_from().is_some() || query.date_to().is_some() {
            md.push_str(&format!(
                "**Date Range**: {} to {}\n",
                query.date_from().unwrap_or("earliest"),
                query.date_to().unwrap_or("present")
            ));
        }
        md.push_str("\n---\n\n");

        md.push_str("## Executive Summary\n\n");
        md.push_str(&report.summary);
        md.push_str("\n\n");

        if !report.insights.is_empty() {
            md.push_str("## Key Insights\n\n");
            for (idx, insight) in report.insights.iter().enumerate() {
                md.push_str(&format!("{}. {}\n", idx + 1, insight));
            }
            md.push('\n');
        }

        if !report.results.is_empty() {
            md.push_str(&format!(
                "## Research Results ({} found)\n\n",
                report.results.len()
            ));
            for (source, results) in group_by_source(&report.results) {
                md.push_str(&format!(
                    "### {} ({})\n\n",
                    source_label(source),
                    results.len()
                ));
                for (idx, result) in results.iter().enumerate() {
                    render_result(&mut md, idx + 1, result);
                }
            }
        }

        md.push_str("---\n\n");
        md.push_str(&format!(
            "*Report generated by deep-research using {}*\n",
            self.model
        ));
        md
    }
}

/// 按数据源首次出现的顺序分组
fn group_by_source(results: &[ResearchResult]) -> Vec<(&str, Vec<&ResearchResult>)> {
    let mut groups: Vec<(&str, Vec<&ResearchResult>)> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|(source, _)| *source == result.source) {
            Some((_, group)) => group.push(result),
            None => groups.push((&result.source, vec![result])),
        }
    }
    groups
}

fn render_result(md: &mut String, index: usize, result: &ResearchResult) {
    md.push_str(&format!("#### {}. {}\n\n", index, result.title));

    if !result.authors.is_empty() {
        let mut authors = result
            .authors
            .iter()
            .take(MAX_LISTED_AUTHORS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if result.authors.len() > MAX_LISTED_AUTHORS {
            authors.push_str(" et al.");
        }
        md.push_str(&format!("- **Authors**: {}\n", authors));
    }
    if !result.published_date.is_empty() {
        md.push_str(&format!("- **Published**: {}\n", result.published_date));
    }
    md.push_str(&format!("- **Source**: {}\n", result.source));
    if !result.url.is_empty() {
        md.push_str(&format!("- **URL**: {}\n", result.url));
    }
    md.push_str(&format!("\n{}\n\n", result.abstract_text));
}
