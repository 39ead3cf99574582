use anyhow::{Context, Result, bail};
use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "deep_research.toml";

/// 默认启用的数据源
pub const DEFAULT_ENABLED_SOURCES: [&str; 5] =
    ["arxiv", "web", "news", "semantic_scholar", "hackernews"];

/// 默认回溯天数，用于推导起始日期
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// 应用程序配置
///
/// 启动时构建一次，随后以引用形式传入各个组件，不存在全局可变状态。
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 数据源访问配置
    pub sources: SourcesConfig,

    /// 每个数据源的默认检索条数
    pub max_results: usize,

    /// 默认起始日期（YYYY-MM-DD）
    pub default_date_from: String,

    /// 报告输出目录
    pub output_dir: PathBuf,

    /// 启用的数据源
    pub enabled_sources: Vec<String>,

    /// 是否启用相关性过滤
    pub enable_relevance_filter: bool,

    /// 相关性过滤的进度汇报粒度
    pub filter_batch_size: usize,

    /// 是否启用模型选源
    pub enable_source_selection: bool,

    /// 模型选源时至少保留的数据源数量
    pub min_selected_sources: usize,

    /// 是否启用检索语句改写
    pub enable_query_rewrite: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置，对接 OpenAI 兼容的 chat completion 接口
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM API基地址
    pub api_base_url: String,

    /// LLM API KEY
    pub api_key: String,

    /// 模型名称
    pub model: String,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 数据源的凭据与请求参数
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    /// HTTP 请求超时时间（秒）
    pub request_timeout_seconds: u64,

    /// 请求使用的 User-Agent
    pub user_agent: String,

    /// CORE API KEY（可选，提升限额）
    pub core_api_key: Option<String>,

    /// GitHub Token（可选，提升限额）
    pub github_token: Option<String>,

    /// Semantic Scholar API KEY（可选）
    pub semantic_scholar_api_key: Option<String>,

    /// Crossref polite pool 联系邮箱
    pub crossref_mailto: String,

    /// OpenAlex polite pool 联系邮箱
    pub openalex_mailto: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 按 默认值 → 配置文件 → 环境变量 的顺序构建配置
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// 使用给定的查找函数覆盖配置，便于测试时不依赖进程环境变量
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // 新变量名优先，缺失时读取旧的同名变量
        let get = |key: &str| {
            lookup(key)
                .or_else(|| legacy_env_key(key).and_then(|legacy| lookup(legacy)))
                .map(|v| v.trim().to_string())
        };

        if let Some(v) = get("RESEARCH_LLM_BASE_URL") {
            self.llm.api_base_url = v;
        }
        if let Some(v) = get("RESEARCH_LLM_API_KEY") {
            self.llm.api_key = v;
        }
        if let Some(v) = get("RESEARCH_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("RESEARCH_LLM_TIMEOUT_SECONDS") {
            self.llm.timeout_seconds = parse_or("RESEARCH_LLM_TIMEOUT_SECONDS", &v, self.llm.timeout_seconds);
        }
        if let Some(v) = get("RESEARCH_MAX_RESULTS") {
            self.max_results = parse_or("RESEARCH_MAX_RESULTS", &v, self.max_results);
        }
        if let Some(v) = get("RESEARCH_DEFAULT_DATE_FROM").filter(|v| !v.is_empty()) {
            self.default_date_from = v;
        }
        if let Some(v) = get("RESEARCH_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = get("RESEARCH_ENABLED_SOURCES") {
            self.enabled_sources = split_list(&v);
        }
        if let Some(v) = get("RESEARCH_ENABLE_RELEVANCE_FILTER") {
            self.enable_relevance_filter = parse_flag(&v);
        }
        if let Some(v) = get("RESEARCH_FILTER_BATCH_SIZE") {
            self.filter_batch_size = parse_or("RESEARCH_FILTER_BATCH_SIZE", &v, self.filter_batch_size);
        }
        if let Some(v) = get("RESEARCH_ENABLE_SOURCE_SELECTION") {
            self.enable_source_selection = parse_flag(&v);
        }
        if let Some(v) = get("RESEARCH_MIN_SELECTED_SOURCES") {
            self.min_selected_sources =
                parse_or("RESEARCH_MIN_SELECTED_SOURCES", &v, self.min_selected_sources);
        }
        if let Some(v) = get("RESEARCH_ENABLE_QUERY_REWRITE") {
            self.enable_query_rewrite = parse_flag(&v);
        }
        if let Some(v) = get("RESEARCH_HTTP_TIMEOUT_SECONDS") {
            self.sources.request_timeout_seconds = parse_or(
                "RESEARCH_HTTP_TIMEOUT_SECONDS",
                &v,
                self.sources.request_timeout_seconds,
            );
        }
        if let Some(v) = get("CORE_API_KEY").filter(|v| !v.is_empty()) {
            self.sources.core_api_key = Some(v);
        }
        if let Some(v) = get("GITHUB_TOKEN").filter(|v| !v.is_empty()) {
            self.sources.github_token = Some(v);
        }
        if let Some(v) = get("SEMANTIC_SCHOLAR_API_KEY").filter(|v| !v.is_empty()) {
            self.sources.semantic_scholar_api_key = Some(v);
        }
        if let Some(v) = get("CROSSREF_MAILTO").filter(|v| !v.is_empty()) {
            self.sources.crossref_mailto = v;
        }
        if let Some(v) = get("OPENALEX_MAILTO").filter(|v| !v.is_empty()) {
            self.sources.openalex_mailto = v;
        }
    }

    /// 校验必填项
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_base_url.trim().is_empty() {
            bail!(
                "RESEARCH_LLM_BASE_URL is required. Please set it in your .env file, config file or environment variables."
            );
        }
        if self.llm.model.trim().is_empty() {
            bail!("RESEARCH_LLM_MODEL must not be empty");
        }
        Ok(())
    }
}

/// 旧版本使用的环境变量名
pub fn legacy_env_key(key: &str) -> Option<&'static str> {
    let legacy = match key {
        "RESEARCH_LLM_BASE_URL" => "OLLAMA_BASE_URL",
        "RESEARCH_LLM_API_KEY" => "OLLAMA_API_KEY",
        "RESEARCH_LLM_MODEL" => "OLLAMA_MODEL",
        "RESEARCH_MAX_RESULTS" => "MAX_RESULTS",
        "RESEARCH_DEFAULT_DATE_FROM" => "DEFAULT_DATE_FROM",
        "RESEARCH_OUTPUT_DIR" => "OUTPUT_DIR",
        "RESEARCH_ENABLED_SOURCES" => "ENABLED_SOURCES",
        "RESEARCH_ENABLE_RELEVANCE_FILTER" => "ENABLE_RELEVANCE_FILTER",
        "RESEARCH_FILTER_BATCH_SIZE" => "FILTER_BATCH_SIZE",
        "RESEARCH_ENABLE_SOURCE_SELECTION" => "ENABLE_SOURCE_SELECTION",
        _ => return None,
    };
    Some(legacy)
}

/// 解析布尔开关，接受 true / 1 / yes
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// 解析逗号分隔列表，忽略空项
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<T>(key: &str, value: &str, fallback: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!(key, value, "invalid numeric setting, keeping default");
            fallback
        }
    }
}

/// 默认起始日期：当前日期往前回溯一年
fn default_date_from() -> String {
    (Local::now() - Duration::days(DEFAULT_LOOKBACK_DAYS))
        .format("%Y-%m-%d")
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            sources: SourcesConfig::default(),
            max_results: 10,
            default_date_from: default_date_from(),
            output_dir: PathBuf::from("outputs"),
            enabled_sources: DEFAULT_ENABLED_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enable_relevance_filter: true,
            filter_batch_size: 1,
            enable_source_selection: true,
            min_selected_sources: 2,
            enable_query_rewrite: true,
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("http://localhost:11434/v1"),
            api_key: String::from("ollama-local"),
            model: String::from("llama3.2"),
            timeout_seconds: 300,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            user_agent: String::from("DeepResearchTool/1.0"),
            core_api_key: None,
            github_token: None,
            semantic_scholar_api_key: None,
            crossref_mailto: String::from("research@example.org"),
            openalex_mailto: String::from("research@example.com"),
        }
    }
}
