use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// 单个数据源允许的最小检索条数
pub const MIN_RESULTS: usize = 1;
/// 单个数据源允许的最大检索条数
pub const MAX_RESULTS: usize = 100;
/// 默认检索条数
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// 一次调研请求的输入
///
/// 构造后不再修改，改写后的检索语句通过 [`ResearchQuery::with_search_query`] 生成新的值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchQuery {
    /// 调研主题
    topic: String,
    /// 由模型改写后的检索语句
    search_query: Option<String>,
    /// 起始日期（YYYY-MM-DD，包含）
    date_from: Option<String>,
    /// 截止日期（YYYY-MM-DD，包含）
    date_to: Option<String>,
    /// 每个数据源的最大检索条数
    max_results: usize,
}

impl ResearchQuery {
    pub fn new(
        topic: impl Into<String>,
        date_from: Option<String>,
        date_to: Option<String>,
        max_results: usize,
    ) -> Result<Self> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            bail!("Research topic must not be empty");
        }

        Ok(Self {
            topic,
            search_query: None,
            date_from: date_from.filter(|d| !d.trim().is_empty()),
            date_to: date_to.filter(|d| !d.trim().is_empty()),
            max_results: max_results.clamp(MIN_RESULTS, MAX_RESULTS),
        })
    }

    /// 仅指定主题，其余使用默认值
    pub fn from_topic(topic: impl Into<String>) -> Result<Self> {
        Self::new(topic, None, None, DEFAULT_MAX_RESULTS)
    }

    /// 返回带有改写检索语句的新查询
    pub fn with_search_query(&self, search_query: impl Into<String>) -> Self {
        Self {
            search_query: Some(search_query.into()),
            ..self.clone()
        }
    }

    /// 实际用于检索的语句：改写结果优先，否则为原始主题
    pub fn effective_query(&self) -> &str {
        match self.search_query.as_deref() {
            Some(q) if !q.trim().is_empty() => q,
            _ => &self.topic,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn date_from(&self) -> Option<&str> {
        self.date_from.as_deref()
    }

    pub fn date_to(&self) -> Option<&str> {
        self.date_to.as_deref()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}
