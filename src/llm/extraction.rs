//! 从模型的自由文本回复中尽力提取结构化数据

use serde::de::DeserializeOwned;

/// 提取结果，标记走的是结构化解析还是兜底路径
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    Structured(T),
    Fallback(T),
}

impl<T> Extraction<T> {
    pub fn into_inner(self) -> T {
        match self {
            Extraction::Structured(value) | Extraction::Fallback(value) => value,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Extraction::Structured(_))
    }
}

/// 去掉包裹 JSON 的 markdown 代码块
///
/// 回复中出现 ``` 时，截取第一个 `{` 到最后一个 `}` 之间的内容。
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if trimmed.contains("```") {
        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if start < end {
                return &trimmed[start..=end];
            }
        }
    }
    trimmed
}

/// 解析 JSON 回复
pub fn parse_json<T: DeserializeOwned>(response: &str) -> serde_json::Result<T> {
    serde_json::from_str(strip_code_fence(response))
}

/// 优先按 JSON 解析，失败时交给兜底函数处理原始文本
pub fn extract_or_else<T, F>(response: &str, fallback: F) -> Extraction<T>
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> T,
{
    match parse_json::<T>(response) {
        Ok(value) => Extraction::Structured(value),
        Err(e) => {
            tracing::debug!(error = %e, "structured extraction failed, using fallback");
            Extraction::Fallback(fallback(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        relevant: bool,
    }

    #[test]
    fn test_strip_code_fence() {
        let response = "Here you go:\n```json\n{\"relevant\": true}\n```\nThanks";
        assert_eq!(strip_code_fence(response), "{\"relevant\": true}");
    }

    #[test]
    fn test_strip_code_fence_plain_json_untouched() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_structured() {
        let extraction = extract_or_else("```\n{\"relevant\": false}\n```", |_| Verdict {
            relevant: true,
        });
        assert!(extraction.is_structured());
        assert_eq!(extraction.into_inner(), Verdict { relevant: false });
    }

    #[test]
    fn test_extract_fallback() {
        let extraction = extract_or_else("not json at all", |text| Verdict {
            relevant: text.contains("json"),
        });
        assert_eq!(extraction, Extraction::Fallback(Verdict { relevant: true }));
    }
}
