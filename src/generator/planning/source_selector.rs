//! 由模型按主题挑选数据源

use serde_json::Value;
use std::collections::BTreeMap;

use crate::llm::extraction::parse_json;
use crate::llm::{CompletionOptions, LanguageModel};

const SYSTEM_PROMPT: &str =
    "You are a research source selection expert. You always answer with a single JSON object.";

/// 各数据源的能力描述
pub fn source_description(name: &str) -> Option<&'static str> {
    let description = match name {
        "arxiv" => {
            "Academic research papers in physics, computer science, mathematics, biology, and other sciences. Best for: fundamental research, algorithms, theoretical work, scientific discoveries."
        }
        "semantic_scholar" => {
            "Academic papers with citation data across all fields. Best for: research papers, academic citations, scholarly work, scientific studies."
        }
        "news" => {
            "Recent news articles, press releases, and industry announcements. Best for: current events, company news, product launches, industry trends, breaking developments."
        }
        "web" => {
            "General web content including blogs, documentation, tutorials, and technical articles. Best for: practical guides, tools documentation, best practices, how-tos, engineering blogs."
        }
        "hackernews" => {
            "Tech community discussions and curated links. Best for: trending tech topics, startup news, developer perspectives, community opinions, popular tools."
        }
        "dblp" => {
            "Comprehensive computer science bibliography covering journals, conferences, and workshops. Best for: computer science publications, conference papers, CS venues, author bibliographies."
        }
        "openalex" => {
            "Fully-open index of 474M+ scholarly works across all disciplines. Best for: broad academic search, interdisciplinary research, citation analysis, open access papers."
        }
        "crossref" => {
            "Metadata for 140M+ scholarly works from publishers worldwide including journals, books, and dissertations. Best for: published research across all fields, DOI lookup, publisher metadata, citation counts."
        }
        "core" => {
            "Aggregator of 300M+ open access research papers from repositories and journals. Best for: open access papers, institutional repository content, full-text access, interdisciplinary research."
        }
        "europepmc" => {
            "40M+ life sciences publications including PubMed and PubMed Central. Best for: biomedical research, medicine, biology, pharmacology, clinical studies, life sciences."
        }
        "reddit" => {
            "Community discussions, user experiences, and opinions across all topics. Best for: real-world experiences, tool comparisons, industry practices, community sentiment, product feedback, troubleshooting, market insights."
        }
        "github" => {
            "Open source repositories with stars, forks, and project metadata. Best for: open source tools, software projects, library adoption, code examples, technology landscape, developer tools."
        }
        _ => return None,
    };
    Some(description)
}

/// 选源结果的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// 采用模型的选择
    Selected,
    /// 模型选择过少，回退到全部候选
    TooFew,
    /// 回复无法解析，回退到全部候选
    ParseFailed,
    /// 模型调用失败，回退到全部候选
    CallFailed,
    /// 没有候选数据源
    NoCandidates,
}

/// 选源结果，`reasoning` 只用于展示
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSelection {
    pub selected: Vec<String>,
    pub reasoning: BTreeMap<String, String>,
    pub outcome: SelectionOutcome,
}

impl SourceSelection {
    fn fallback(candidates: &[String], key: &str, reason: String, outcome: SelectionOutcome) -> Self {
        Self {
            selected: candidates.to_vec(),
            reasoning: BTreeMap::from([(key.to_string(), reason)]),
            outcome,
        }
    }
}

/// 数据源选择器
pub struct SourceSelector<'a> {
    llm: &'a dyn LanguageModel,
    min_sources: usize,
}

impl<'a> SourceSelector<'a> {
    pub fn new(llm: &'a dyn LanguageModel, min_sources: usize) -> Self {
        Self { llm, min_sources }
    }

    /// 为主题挑选数据源，任何失败都回退到全部候选
    pub async fn select(&self, topic: &str, candidates: &[String]) -> SourceSelection {
        if candidates.is_empty() {
            return SourceSelection {
                selected: Vec::new(),
                reasoning: BTreeMap::new(),
                outcome: SelectionOutcome::NoCandidates,
            };
        }

        let prompt = build_prompt(topic, candidates, self.min_sources);
        let options = CompletionOptions::new(500).with_temperature(0.2);

        match self.llm.complete(SYSTEM_PROMPT, &prompt, options).await {
            Ok(response) => interpret_reply(&response, candidates, self.min_sources),
            Err(e) => {
                tracing::warn!(error = %e, "source selection call failed");
                SourceSelection::fallback(
                    candidates,
                    "error",
                    e.to_string(),
                    SelectionOutcome::CallFailed,
                )
            }
        }
    }
}

/// 构建选源提示词
pub fn build_prompt(topic: &str, candidates: &[String], min_sources: usize) -> String {
    let descriptions = candidates
        .iter()
        .map(|name| {
            format!(
                "- **{}**: {}",
                name,
                source_description(name).unwrap_or("No description available.")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let minimum = min_sources.min(candidates.len()).max(1);

    format!(
        r#"Analyze the research topic below and select the most appropriate sources to search.

Research Topic: {topic}

Available Sources:
{descriptions}

Your task:
1. Determine what type of information would be most valuable for this topic
2. Select the sources most likely to return relevant, high-quality results
3. Consider whether the topic is academic, industry/practical, or mixed
4. Give a brief reason for each selection or exclusion

Rules:
- Select at least {minimum} sources for coverage
- Only use source names from the list above
- For industry or practical topics (tools, platforms, company practices), include "web" and "news" when available
- For academic topics, prioritize academic sources but consider "web" for practical context
- Do not select sources that are clearly irrelevant
- When in doubt, include a source rather than exclude it

Respond with ONLY a JSON object in this exact format:
{{
  "selected": ["source1", "source2"],
  "reasoning": {{
    "source1": "reason for selection",
    "excluded_source": "reason for exclusion"
  }}
}}"#
    )
}

/// 解析模型回复
///
/// 丢弃不在候选中的名字；剩余数量少于 `min(阈值, 候选数)` 时回退到全部候选。
pub fn interpret_reply(response: &str, candidates: &[String], min_sources: usize) -> SourceSelection {
    let reply: Value = match parse_json(response) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::debug!(error = %e, "source selection reply is not valid JSON");
            return SourceSelection::fallback(
                candidates,
                "error",
                "JSON parse failed".to_string(),
                SelectionOutcome::ParseFailed,
            );
        }
    };

    // 只保留候选中的字符串条目，其它类型直接忽略
    let mut selected: Vec<String> = Vec::new();
    let names = reply
        .get("selected")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>())
        .unwrap_or_default();
    for name in names {
        let name = name.trim().to_string();
        if candidates.contains(&name) && !selected.contains(&name) {
            selected.push(name);
        }
    }

    let required = min_sources.min(candidates.len());
    if selected.len() < required || selected.is_empty() {
        return SourceSelection::fallback(
            candidates,
            "fallback",
            "LLM selected too few sources".to_string(),
            SelectionOutcome::TooFew,
        );
    }

    SourceSelection {
        selected,
        reasoning: read_reasoning(reply.get("reasoning")),
        outcome: SelectionOutcome::Selected,
    }
}

/// 理由仅用于展示：对象按键读取，单个字符串记在 `summary` 下，其它形式忽略
fn read_reasoning(reasoning: Option<&Value>) -> BTreeMap<String, String> {
    match reasoning {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, reason)| {
                let reason = match reason {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), reason)
            })
            .collect(),
        Some(Value::String(text)) if !text.trim().is_empty() => {
            BTreeMap::from([("summary".to_string(), text.trim().to_string())])
        }
        _ => BTreeMap::new(),
    }
}
