use serde::{Deserialize, Serialize};

/// 数据源未提供摘要、也无可拼接的元数据时使用的占位文本
pub const NO_ABSTRACT: &str = "No abstract available";

/// 各数据源统一输出的检索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    /// 标题（非空）
    pub title: String,
    /// 摘要或内容概述
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// 原始链接，部分数据源可能为空
    pub url: String,
    /// 发布日期，YYYY-MM-DD 或空字符串
    pub published_date: String,
    /// 数据源标识，如 `arxiv`、`web`
    pub source: String,
    /// 作者列表
    #[serde(default)]
    pub authors: Vec<String>,
}

impl ResearchResult {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: NO_ABSTRACT.to_string(),
            url: String::new(),
            published_date: String::new(),
            source: source.into(),
            authors: Vec::new(),
        }
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = abstract_text.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_published_date(mut self, published_date: impl Into<String>) -> Self {
        self.published_date = published_date.into();
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }
}
