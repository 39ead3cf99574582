//! 调用模型综合全部检索结果，生成摘要与洞察

use anyhow::{Context, Result};

use crate::llm::extraction::Extraction;
use crate::llm::{CompletionOptions, LanguageModel};
use crate::sources::normalize::truncate_chars;
use crate::types::{ResearchQuery, ResearchResult};

const SYSTEM_PROMPT: &str =
    "You are a research analyst who synthesizes insights from academic papers and other sources.";

/// 每条结果送入提示词的摘要字符数
const ABSTRACT_PREVIEW_CHARS: usize = 500;
/// 无法识别段落结构时作为摘要的字符数
const SUMMARY_FALLBACK_CHARS: usize = 800;
/// 最多保留的洞察条数
const MAX_INSIGHTS: usize = 10;
/// 结构化解析时洞察的最小长度（不含）
const MIN_SECTION_INSIGHT_CHARS: usize = 10;
/// 段落兜底解析时洞察的最小长度（不含）
const MIN_PARAGRAPH_INSIGHT_CHARS: usize = 20;
/// 洞察行首需要去掉的列表符号
const INSIGHT_MARKERS: &[char] = &['•', '-', '*', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ' '];

/// 分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: String,
    pub insights: Vec<String>,
}

/// 研究分析器
pub struct Analyzer<'a> {
    llm: &'a dyn LanguageModel,
}

impl<'a> Analyzer<'a> {
    pub fn new(llm: &'a dyn LanguageModel) -> Self {
        Self { llm }
    }

    /// 综合分析检索结果；结果为空时不调用模型
    pub async fn analyze(
        &self,
        query: &ResearchQuery,
        results: &[ResearchResult],
    ) -> Result<Analysis> {
        if results.is_empty() {
            return Ok(Analysis {
                summary: format!("No research results found for the topic: {}", query.topic()),
                insights: vec!["No data available for analysis".to_string()],
            });
        }

        let response = self
            .llm
            .complete(
                SYSTEM_PROMPT,
                &build_prompt(query, results),
                CompletionOptions::new(4000),
            )
            .await
            .context("Failed to analyze research with LLM")?;

        let extraction = parse_analysis(&response);
        if !extraction.is_structured() {
            tracing::debug!("analysis reply has no section headers, using paragraph fallback");
        }
        Ok(extraction.into_inner())
    }
}

/// 构建分析提示词
pub fn build_prompt(query: &ResearchQuery, results: &[ResearchResult]) -> String {
    format!(
        r#"Synthesize insights from the research papers and sources collected below.

Research Topic: {topic}

I have collected {count} research papers and sources on this topic ({breakdown}). Please analyze them and provide:

1. **Executive Summary**: A concise 2-3 paragraph overview of the current state of research in this area
2. **Key Insights**: 5-7 specific, actionable insights or trends you observe from this research
3. **Notable Findings**: Any particularly interesting or significant findings that stand out

Research Papers:

{context}

Please provide your analysis in a clear, structured format."#,
        topic = query.topic(),
        count = results.len(),
        breakdown = source_breakdown(results),
        context = build_context(results),
    )
}

/// 按首次出现顺序统计各数据源的结果数，如 `2 from arxiv, 1 from web`
pub fn source_breakdown(results: &[ResearchResult]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for result in results {
        match counts.iter_mut().find(|(source, _)| *source == result.source) {
            Some((_, count)) => *count += 1,
            None => counts.push((&result.source, 1)),
        }
    }

    counts
        .iter()
        .map(|(source, count)| format!("{} from {}", count, source))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 把每条结果格式化为一段上下文
pub fn build_context(results: &[ResearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let mut authors = if result.authors.is_empty() {
                "Unknown".to_string()
            } else {
                result
                    .authors
                    .iter()
                    .take(3)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            if result.authors.len() > 3 {
                authors.push_str(" et al.");
            }

            format!(
                "Paper {}:\nTitle: {}\nAuthors: {}\nDate: {}\nSource: {}\nAbstract: {}...\nURL: {}",
                idx + 1,
                result.title,
                authors,
                result.published_date,
                result.source,
                truncate_chars(&result.abstract_text, ABSTRACT_PREVIEW_CHARS),
                result.url,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Summary,
    Insights,
}

fn strip_marker(line: &str) -> &str {
    line.trim_start_matches(INSIGHT_MARKERS)
}

/// 解析模型回复
///
/// 先按段落标题识别摘要与洞察；完全识别不到时按空行切分段落兜底。
pub fn parse_analysis(response: &str) -> Extraction<Analysis> {
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut insights: Vec<String> = Vec::new();
    let mut section = None;

    for line in response.lines().map(str::trim) {
        let lower = line.to_lowercase();
        if lower.contains("summary") {
            section = Some(Section::Summary);
            continue;
        }
        if lower.contains("insights") || lower.contains("notable findings") {
            section = Some(Section::Insights);
            continue;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match section {
            Some(Section::Summary) => summary_lines.push(line),
            Some(Section::Insights) => {
                let cleaned = strip_marker(line);
                if cleaned.chars().count() > MIN_SECTION_INSIGHT_CHARS {
                    insights.push(cleaned.to_string());
                }
            }
            None => {}
        }
    }

    let structured = !summary_lines.is_empty() || !insights.is_empty();

    if !structured {
        let mut paragraphs = response
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(first) = paragraphs.next() {
            summary_lines.push(first);
            for paragraph in paragraphs {
                for line in paragraph.lines() {
                    let cleaned = strip_marker(line.trim());
                    if cleaned.chars().count() > MIN_PARAGRAPH_INSIGHT_CHARS {
                        insights.push(cleaned.to_string());
                    }
                }
            }
        }
    }

    let summary = if summary_lines.is_empty() {
        format!("{}...", truncate_chars(response, SUMMARY_FALLBACK_CHARS))
    } else {
        summary_lines.join(" ")
    };

    insights.truncate(MAX_INSIGHTS);
    if insights.is_empty() {
        insights.push("Analysis provided in summary".to_string());
    }

    let analysis = Analysis { summary, insights };
    if structured {
        Extraction::Structured(analysis)
    } else {
        Extraction::Fallback(analysis)
    }
}
