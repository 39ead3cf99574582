//! LLM客户端 - 基于 rig 的 OpenAI 兼容实现

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::{CompletionOptions, LanguageModel};

mod providers;

use providers::ProviderClient;

/// LLM客户端
///
/// 每次调用只发送一轮 system/user 消息，超时由配置决定，失败不重试。
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(config)?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<String> {
        let agent = self
            .client
            .create_agent(&self.config.model, system_prompt, &options);

        tracing::debug!(
            model = %self.config.model,
            max_tokens = options.max_tokens,
            "sending chat completion request"
        );

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let content = tokio::time::timeout(timeout, agent.prompt(user_prompt))
            .await
            .map_err(|_| {
                anyhow!(
                    "LLM request timed out after {} seconds",
                    self.config.timeout_seconds
                )
            })?
            .context("LLM request failed")?;

        if content.trim().is_empty() {
            bail!("LLM returned empty content");
        }

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
