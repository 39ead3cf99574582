use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::Config,
    llm::{LLMClient, LanguageModel},
    sources::{SourceRegistry, build_http_client},
};

/// 一次调研运行共享的组件
#[derive(Clone)]
pub struct GeneratorContext {
    /// 语言模型，用于选源、改写、过滤与分析
    pub llm: Arc<dyn LanguageModel>,
    /// 配置
    pub config: Config,
    /// 数据源注册表
    pub registry: Arc<SourceRegistry>,
}

impl GeneratorContext {
    /// 根据配置创建真实的模型客户端与数据源
    pub fn new(config: Config) -> Result<Self> {
        let llm = LLMClient::new(&config.llm)?;
        let http = build_http_client(&config.sources)?;
        let registry = SourceRegistry::from_config(&config, http);

        Ok(Self::with_components(config, Arc::new(llm), registry))
    }

    /// 使用外部提供的模型与数据源，测试中用于注入替身
    pub fn with_components(
        config: Config,
        llm: Arc<dyn LanguageModel>,
        registry: SourceRegistry,
    ) -> Self {
        Self {
            llm,
            config,
            registry: Arc::new(registry),
        }
    }
}
