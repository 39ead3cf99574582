//! 语言模型访问层
//!
//! 流水线中的各个阶段只依赖 [`LanguageModel`]，测试时可以替换为脚本化的实现。

use anyhow::Result;
use async_trait::async_trait;

pub mod client;
pub mod extraction;

#[cfg(test)]
pub(crate) mod mock;

pub use client::LLMClient;
pub use extraction::Extraction;

/// 单次调用的生成参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u64,
    /// 为空时使用服务端默认温度
    pub temperature: Option<f64>,
}

impl CompletionOptions {
    pub fn new(max_tokens: u64) -> Self {
        Self {
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// 单轮 chat completion 能力
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 发送一组 system/user 消息并返回助手回复文本，回复为空视为错误
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<String>;

    /// 当前使用的模型名称，用于报告页脚
    fn model_name(&self) -> &str;
}
