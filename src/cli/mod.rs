use crate::config::{Config, split_list};
use crate::types::ResearchQuery;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Deep Research - 由Rust与AI驱动的自动化调研报告生成工具
#[derive(Parser, Debug)]
#[command(name = "deep-research")]
#[command(
    about = "Automated research synthesis: queries academic indexes, web/news search and community sites, lets an LLM select sources, rewrite the query and judge relevance, then writes a Markdown research report."
)]
#[command(version)]
pub struct Args {
    /// 调研主题
    #[arg(short, long)]
    pub topic: String,

    /// 起始日期（YYYY-MM-DD），默认为一年前
    #[arg(long)]
    pub date_from: Option<String>,

    /// 截止日期（YYYY-MM-DD）
    #[arg(long)]
    pub date_to: Option<String>,

    /// 每个数据源的最大检索条数
    #[arg(short, long)]
    pub max_results: Option<usize>,

    /// 报告输出文件
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 排除的数据源，逗号分隔
    #[arg(long)]
    pub exclude_source: Option<String>,

    /// 禁用相关性过滤
    #[arg(long)]
    pub no_filter: bool,

    /// 禁用模型选源
    #[arg(long)]
    pub no_source_selection: bool,

    /// 禁用检索语句改写
    #[arg(long)]
    pub no_rewrite: bool,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 加载配置并叠加CLI参数
    pub fn into_config(&self) -> Result<Config> {
        let config = Config::load(self.config.as_deref())?;
        Ok(self.apply_overrides(config))
    }

    /// CLI参数优先级最高，覆盖配置文件与环境变量中的设置
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(max_results) = self.max_results {
            config.max_results = max_results;
        }
        if self.no_filter {
            config.enable_relevance_filter = false;
        }
        if self.no_source_selection {
            config.enable_source_selection = false;
        }
        if self.no_rewrite {
            config.enable_query_rewrite = false;
        }
        if self.verbose {
            config.verbose = true;
        }
        config
    }

    /// 被排除的数据源列表
    pub fn excluded_sources(&self) -> Vec<String> {
        self.exclude_source
            .as_deref()
            .map(split_list)
            .unwrap_or_default()
    }

    /// 根据CLI参数构建调研请求，未指定起始日期时使用配置中的默认值
    pub fn to_query(&self, config: &Config) -> Result<ResearchQuery> {
        let date_from = self
            .date_from
            .clone()
            .or_else(|| Some(config.default_date_from.clone()));

        ResearchQuery::new(
            &self.topic,
            date_from,
            self.date_to.clone(),
            config.max_results,
        )
    }
}

// Include tests
#[cfg(test)]
mod tests;
