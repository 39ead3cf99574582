//! 外部数据源适配器
//!
//! 每个适配器负责一次 HTTP 调用并把响应映射为统一的 [`ResearchResult`]。
//! 响应解析都拆成纯函数，便于用固定样本测试。

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Config, SourcesConfig};
use crate::types::{ResearchQuery, ResearchResult};

pub mod arxiv;
pub mod core_api;
pub mod crossref;
pub mod dblp;
pub mod europepmc;
pub mod github;
pub mod hackernews;
pub mod normalize;
pub mod openalex;
pub mod reddit;
pub mod semantic_scholar;
pub mod web;

pub use arxiv::ArxivSource;
pub use core_api::CoreSource;
pub use crossref::CrossrefSource;
pub use dblp::DblpSource;
pub use europepmc::EuropePmcSource;
pub use github::GithubSource;
pub use hackernews::HackerNewsSource;
pub use openalex::OpenAlexSource;
pub use reddit::RedditSource;
pub use semantic_scholar::SemanticScholarSource;
pub use web::{NewsSource, WebSource};

/// 单个数据源的检索参数
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            date_from: None,
            date_to: None,
            max_results,
        }
    }

    pub fn with_dates(mut self, date_from: Option<String>, date_to: Option<String>) -> Self {
        self.date_from = date_from;
        self.date_to = date_to;
        self
    }

    /// 由调研请求构建，检索语句使用改写结果
    pub fn from_query(query: &ResearchQuery) -> Self {
        Self::new(query.effective_query(), query.max_results()).with_dates(
            query.date_from().map(str::to_string),
            query.date_to().map(str::to_string),
        )
    }
}

/// 数据源错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to reach {provider}: {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error (HTTP {status})")]
    Status { provider: String, status: u16 },

    #[error("{provider} rate limit exceeded. {hint}")]
    RateLimit { provider: String, hint: String },

    #[error("Failed to parse {provider} response: {message}")]
    Parse { provider: String, message: String },
}

impl SourceError {
    pub fn parse(provider: &str, message: impl Into<String>) -> Self {
        SourceError::Parse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SourceError::RateLimit { .. })
    }
}

/// 数据源适配器
#[async_trait]
pub trait Source: Send + Sync {
    /// 数据源标识，同时作为结果的 `source` 字段
    fn id(&self) -> &str;

    /// 是否支持按日期过滤（服务端或客户端）
    fn supports_date_filter(&self) -> bool {
        true
    }

    /// 执行检索，零命中返回空列表
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResearchResult>, SourceError>;
}

/// 限流状态的识别方式与提示
pub(crate) struct RateLimitPolicy {
    pub statuses: &'static [StatusCode],
    pub hint: &'static str,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            statuses: &[StatusCode::TOO_MANY_REQUESTS],
            hint: "Please wait and retry.",
        }
    }
}

/// 发送请求并校验状态码
pub(crate) async fn send(
    provider: &str,
    request: RequestBuilder,
    policy: &RateLimitPolicy,
) -> Result<Response, SourceError> {
    let response = request.send().await.map_err(|e| SourceError::Network {
        provider: provider.to_string(),
        source: e,
    })?;

    let status = response.status();
    if policy.statuses.contains(&status) {
        return Err(SourceError::RateLimit {
            provider: provider.to_string(),
            hint: policy.hint.to_string(),
        });
    }
    if !status.is_success() {
        return Err(SourceError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// 发送请求并解析 JSON 响应
pub(crate) async fn fetch_json(
    provider: &str,
    request: RequestBuilder,
    policy: &RateLimitPolicy,
) -> Result<Value, SourceError> {
    let response = send(provider, request, policy).await?;
    response
        .json::<Value>()
        .await
        .map_err(|e| SourceError::parse(provider, e.to_string()))
}

/// 发送请求并读取文本响应
pub(crate) async fn fetch_text(
    provider: &str,
    request: RequestBuilder,
    policy: &RateLimitPolicy,
) -> Result<String, SourceError> {
    let response = send(provider, request, policy).await?;
    response.text().await.map_err(|e| SourceError::Network {
        provider: provider.to_string(),
        source: e,
    })
}

/// 构建所有适配器共享的 HTTP 客户端
pub fn build_http_client(config: &SourcesConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// 数据源注册表，按标识查找适配器
#[derive(Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Box<dyn Source>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册全部内置适配器
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        let sources = &config.sources;
        let mut registry = Self::new();

        registry.register(Box::new(ArxivSource::new(http.clone())));
        registry.register(Box::new(SemanticScholarSource::new(
            http.clone(),
            sources.semantic_scholar_api_key.clone(),
        )));
        registry.register(Box::new(OpenAlexSource::new(
            http.clone(),
            sources.openalex_mailto.clone(),
        )));
        registry.register(Box::new(CrossrefSource::new(
            http.clone(),
            sources.crossref_mailto.clone(),
            sources.user_agent.clone(),
        )));
        registry.register(Box::new(CoreSource::new(
            http.clone(),
            sources.core_api_key.clone(),
        )));
        registry.register(Box::new(EuropePmcSource::new(http.clone())));
        registry.register(Box::new(DblpSource::new(http.clone())));
        registry.register(Box::new(WebSource::new(http.clone())));
        registry.register(Box::new(NewsSource::new(http.clone())));
        registry.register(Box::new(HackerNewsSource::new(http.clone())));
        registry.register(Box::new(RedditSource::new(http.clone())));
        registry.register(Box::new(GithubSource::new(
            http,
            sources.github_token.clone(),
        )));

        registry
    }

    /// 注册适配器，同名适配器会被替换
    pub fn register(&mut self, source: Box<dyn Source>) {
        self.sources.insert(source.id().to_string(), source);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Source> {
        self.sources.get(id).map(|s| s.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
