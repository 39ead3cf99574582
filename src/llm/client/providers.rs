//! OpenAI 兼容服务的 rig 封装

use anyhow::Result;
use rig::{agent::Agent, client::CompletionClient, completion::Prompt};

use crate::{config::LLMConfig, llm::CompletionOptions};

/// OpenAI 兼容协议的客户端，Ollama、vLLM、LM Studio 等本地服务同样适用
#[derive(Clone)]
pub struct ProviderClient {
    client: rig::providers::openai::Client,
}

impl ProviderClient {
    /// 根据配置创建客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = rig::providers::openai::Client::builder(&config.api_key)
            .base_url(&config.api_base_url)
            .build();
        Ok(Self { client })
    }

    /// 创建Agent
    pub fn create_agent(
        &self,
        model: &str,
        system_prompt: &str,
        options: &CompletionOptions,
    ) -> ProviderAgent {
        let mut builder = self
            .client
            .completion_model(model)
            .completions_api()
            .into_agent_builder()
            .preamble(system_prompt)
            .max_tokens(options.max_tokens);

        if let Some(temperature) = options.temperature {
            builder = builder.temperature(temperature);
        }

        ProviderAgent {
            agent: builder.build(),
        }
    }
}

/// 单次调用使用的Agent
pub struct ProviderAgent {
    agent: Agent<rig::providers::openai::CompletionModel>,
}

impl ProviderAgent {
    /// 执行prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        self.agent.prompt(prompt).await.map_err(|e| e.into())
    }
}
