use crate::model::{GenerationConfig, LlmResponse};
use async_trait::async_trait;

pub mod fake;
pub mod gemini;
pub mod openai;
pub mod tracing;

/// Text-generation boundary the judge talks to. Any service that turns a
/// prompt into a single text reply can sit behind it.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;

    /// Identity of the backing model, for logs and cassettes.
    fn fingerprint(&self) -> Option<String> {
        None
    }
}
