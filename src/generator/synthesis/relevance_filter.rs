use serde::Deserialize;

use crate::llm::extraction::{Extraction, extract_or_else};
use crate::llm::{CompletionOptions, LanguageModel};
use crate::sources::normalize::truncate_chars;
use crate::types::ResearchResult;

const SYSTEM_PROMPT: &str =
    "You are a research assistant that judges whether search results are relevant to a research topic.";

/// 摘要送入判定提示词的最大字符数
const ABSTRACT_PREVIEW_CHARS: usize = 800;

/// 单条结果的相关性判定
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub relevant: bool,
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_reason() -> String {
    "No reason provided".to_string()
}

/// 过滤统计，`relevant + filtered_out == total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub total: usize,
    pub relevant: usize,
    pub filtered_out: usize,
}

/// 逐条调用模型判断检索结果与主题是否相关
pub struct RelevanceFilter<'a> {
    llm: &'a dyn LanguageModel,
    batch_size: usize,
}

impl<'a> RelevanceFilter<'a> {
    pub fn new(llm: &'a dyn LanguageModel, batch_size: usize) -> Self {
        Self {
            llm,
            batch_size: batch_size.max(1),
        }
    }

    /// 过滤结果，保持原有顺序
    pub async fn filter(
        &self,
        topic: &str,
        results: Vec<ResearchResult>,
    ) -> (Vec<ResearchResult>, FilterStats) {
        let total = results.len();
        let mut kept = Vec::with_capacity(total);

        for (index, result) in results.into_iter().enumerate() {
            let verdict = self.judge(topic, &result).await;
            tracing::debug!(
                title = %result.title,
                relevant = verdict.relevant,
                reason = %verdict.reason,
                "relevance verdict"
            );
            if verdict.relevant {
                kept.push(result);
            }

            let checked = index + 1;
            if checked % self.batch_size == 0 || checked == total {
                println!("   🔎 已判定 {}/{} 条结果", checked, total);
            }
        }

        let stats = FilterStats {
            total,
            relevant: kept.len(),
            filtered_out: total - kept.len(),
        };
        (kept, stats)
    }

    /// 判定单条结果；调用失败时保留该结果
    pub async fn judge(&self, topic: &str, result: &ResearchResult) -> Verdict {
        let options = CompletionOptions::new(200).with_temperature(0.1);
        match self
            .llm
            .complete(SYSTEM_PROMPT, &build_prompt(topic, result), options)
            .await
        {
            Ok(response) => interpret_verdict(&response).into_inner(),
            Err(e) => {
                tracing::warn!(error = %e, title = %result.title, "relevance check failed, keeping result");
                Verdict {
                    relevant: true,
                    reason: format!("Error: {}", e),
                }
            }
        }
    }
}

/// 构建判定提示词
pub fn build_prompt(topic: &str, result: &ResearchResult) -> String {
    format!(
        r#"Judge whether the following search result is relevant to the research topic.

Research Topic: {topic}

Title: {title}
Abstract: {abstract_text}
Source: {source}

A result is relevant when it directly addresses the topic or provides useful context for it.
Mark results that only share keywords but discuss something else as not relevant.

Respond with ONLY a JSON object in this exact format:
{{"relevant": true, "reason": "one short sentence"}}"#,
        title = result.title,
        abstract_text = truncate_chars(&result.abstract_text, ABSTRACT_PREVIEW_CHARS),
        source = result.source,
    )
}

/// 解析判定回复
///
/// JSON 解析失败时，回复中任意位置出现 "true"（不区分大小写）即视为相关。
pub fn interpret_verdict(response: &str) -> Extraction<Verdict> {
    extract_or_else(response, |raw| Verdict {
        relevant: raw.to_lowercase().contains("true"),
        reason: "Keyword match fallback".to_string(),
    })
}
