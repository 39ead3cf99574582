//! 适配器共享的字段归一化规则

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::types::result::NO_ABSTRACT;

/// 每条结果保留的最大作者数
pub const MAX_AUTHORS: usize = 10;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?").expect("valid regex")
});

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid regex"));

/// 是否为定长的 YYYY-MM-DD
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE.is_match(value)
}

/// 把各种日期写法归一化为 YYYY-MM-DD，无法识别时返回空串
///
/// 只有年份时补齐为 `YYYY-01-01`，只有年月时补齐为当月第一天。
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    let Some(caps) = DATE_PREFIX.captures(raw) else {
        return String::new();
    };

    let year = &caps[1];
    let month = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(1);
    let day = caps
        .get(3)
        .and_then(|d| d.as_str().parse::<u32>().ok())
        .unwrap_or(1);

    let date = format!("{}-{:02}-{:02}", year, month, day);
    if is_iso_date(&date) { date } else { String::new() }
}

/// 由年份构造日期，超出四位数的年份返回空串
pub fn date_from_year(year: &Value) -> String {
    match year {
        Value::Number(n) => n
            .as_u64()
            .map(|y| format!("{:04}-01-01", y))
            .filter(|date| is_iso_date(date))
            .unwrap_or_default(),
        Value::String(s) => normalize_date(s),
        _ => String::new(),
    }
}

/// 日期是否落在闭区间内
///
/// 空日期永远保留；格式不合法的边界被忽略。
pub fn within_date_range(date: &str, date_from: Option<&str>, date_to: Option<&str>) -> bool {
    if date.is_empty() || !is_iso_date(date) {
        return true;
    }

    if let Some(from) = valid_bound(date_from) {
        if date < from {
            return false;
        }
    }
    if let Some(to) = valid_bound(date_to) {
        if date > to {
            return false;
        }
    }
    true
}

fn valid_bound(bound: Option<&str>) -> Option<&str> {
    let bound = bound?.trim();
    if bound.is_empty() {
        return None;
    }
    if is_iso_date(bound) {
        Some(bound)
    } else {
        tracing::warn!(bound, "ignoring malformed date bound, expected YYYY-MM-DD");
        None
    }
}

/// 年份部分，用于按年过滤的服务端参数
pub fn year_of(date: Option<&str>) -> Option<&str> {
    date.and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
}

/// 候选值中第一个非空者
pub fn first_non_empty<I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}

/// 裸 DOI 转换为解析链接
pub fn doi_url(doi: &str) -> Option<String> {
    let doi = doi.trim();
    if doi.is_empty() {
        None
    } else if doi.starts_with("http") {
        Some(doi.to_string())
    } else {
        Some(format!("https://doi.org/{}", doi))
    }
}

/// 用 " | " 拼接元数据描述，没有任何内容时返回占位文本
pub fn join_abstract(parts: Vec<String>) -> String {
    let parts: Vec<String> = parts.into_iter().filter(|p| !p.trim().is_empty()).collect();
    if parts.is_empty() {
        NO_ABSTRACT.to_string()
    } else {
        parts.join(" | ")
    }
}

/// 摘要文本：换行替换为空格并去掉首尾空白
pub fn clean_abstract(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

/// 去除 JATS / HTML 标签
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").to_string()
}

/// 折叠连续空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 过滤空名字并截断作者列表
pub fn cap_authors<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .take(MAX_AUTHORS)
        .collect()
}

/// 按字符数截断
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// 读取字符串字段，缺失或非字符串时返回空串
pub fn str_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// 读取可选字符串字段，空串视为缺失
pub fn opt_str(value: &Value, key: &str) -> Option<String> {
    Some(str_field(value, key)).filter(|s| !s.is_empty())
}

/// 读取整数字段，缺失时为 0
pub fn u64_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

/// 读取数组字段，缺失时为空
pub fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// 还原 OpenAlex 倒排索引形式的摘要
///
/// 索引为 单词 → 出现位置列表，按位置排序后以空格连接；同一单词出现在多个位置时在每个位置重复。
pub fn reconstruct_inverted_abstract(index: Option<&Value>) -> String {
    let Some(Value::Object(map)) = index else {
        return String::new();
    };

    let mut positioned: Vec<(u64, &str)> = map
        .iter()
        .flat_map(|(word, positions)| {
            positions
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_u64)
                .map(move |pos| (pos, word.as_str()))
        })
        .collect();

    positioned.sort_by_key(|(pos, _)| *pos);
    positioned
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}
