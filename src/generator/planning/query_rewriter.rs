//! 把调研主题改写为更适合检索的语句

use serde_json::Value;

use crate::llm::extraction::parse_json;
use crate::llm::{CompletionOptions, LanguageModel};

const SYSTEM_PROMPT: &str =
    "You are a search query optimizer. You always answer with a single JSON object.";

/// 改写结果
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub query: String,
    pub reasoning: Option<String>,
}

/// 检索语句改写器，失败时原样返回主题
pub struct QueryRewriter<'a> {
    llm: &'a dyn LanguageModel,
}

impl<'a> QueryRewriter<'a> {
    pub fn new(llm: &'a dyn LanguageModel) -> Self {
        Self { llm }
    }

    pub async fn rewrite(&self, topic: &str) -> Rewrite {
        let options = CompletionOptions::new(300).with_temperature(0.3);

        let response = match self
            .llm
            .complete(SYSTEM_PROMPT, &build_prompt(topic), options)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                eprintln!("⚠️ 检索语句改写失败，使用原始主题: {}", e);
                return unchanged(topic);
            }
        };

        interpret_reply(&response, topic)
    }
}

/// 解析改写回复
///
/// 只要 `query` 是非空字符串就原样采用；`reasoning` 仅作展示，非字符串时按 JSON 文本显示。
pub fn interpret_reply(response: &str, topic: &str) -> Rewrite {
    let reply: Value = match parse_json(response) {
        Ok(reply) => reply,
        Err(e) => {
            eprintln!("⚠️ 无法解析改写结果，使用原始主题: {}", e);
            return unchanged(topic);
        }
    };

    let query = reply
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| topic.to_string());

    let reasoning = match reply.get("reasoning") {
        Some(Value::String(text)) => Some(text.trim().to_string()),
        None | Some(Value::Null) => None,
        Some(other) => Some(other.to_string()),
    }
    .filter(|r| !r.is_empty());

    Rewrite { query, reasoning }
}

fn unchanged(topic: &str) -> Rewrite {
    Rewrite {
        query: topic.to_string(),
        reasoning: None,
    }
}

/// 构建改写提示词
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Rewrite the research topic below into a better search query that will return relevant results from academic databases and web search engines.

Original topic: {topic}

Instructions:
1. Identify the core research intent (market analysis, technical overview, academic survey, ...)
2. Add 2-3 key synonyms or related terms that improve recall
3. Add exclusion terms prefixed with - to filter out irrelevant results (for example -resume -job -hiring when the topic is market research, not job listings)
4. Keep the query concise, no more than 15 words excluding exclusion terms
5. Do not add quotes unless an exact phrase is critical
6. Prefer a focused query over a broad one

Respond with ONLY a JSON object in this exact format:
{{"query": "your optimized search query here", "reasoning": "brief explanation of changes"}}"#
    )
}

#[cfg(test)]
mod tests;
