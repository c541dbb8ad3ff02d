use crate::model::{GenerationConfig, LlmResponse};
use crate::providers::llm::LlmClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Wraps a provider in a `gen_ai.client.request` span. The prompt itself is
/// never recorded: it carries the player's free text.
pub struct TracingLlmClient {
    inner: Arc<dyn LlmClient>,
}

impl TracingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmClient for TracingLlmClient {
    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> anyhow::Result<LlmResponse> {
        let provider = self.inner.provider_name();
        let span = info_span!(
            "gen_ai.client.request",
            "gen_ai.system" = provider,
            "gen_ai.request.temperature" = config.temperature as f64,
            "gen_ai.request.model" = tracing::field::Empty,
            "gen_ai.usage.input_tokens" = tracing::field::Empty,
            "gen_ai.usage.output_tokens" = tracing::field::Empty,
            "umpire.prompt_chars" = prompt.chars().count() as u64,
            "umpire.latency_ms" = tracing::field::Empty,
            "error" = tracing::field::Empty,
            "error.message" = tracing::field::Empty
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.complete(prompt, config).await;
            let span = tracing::Span::current();
            span.record("umpire.latency_ms", start.elapsed().as_millis() as u64);

            match &result {
                Ok(resp) => {
                    span.record("gen_ai.request.model", resp.model.as_str());
                    if let Some(usage) = resp.meta.get("usage") {
                        if let Some(i) = usage.get("input_tokens").and_then(|v| v.as_u64()) {
                            span.record("gen_ai.usage.input_tokens", i);
                        }
                        if let Some(o) = usage.get("output_tokens").and_then(|v| v.as_u64()) {
                            span.record("gen_ai.usage.output_tokens", o);
                        }
                    }
                }
                Err(e) => {
                    span.record("error", true);
                    span.record("error.message", e.to_string().as_str());
                    tracing::debug!(provider, "provider call failed: {:#}", e);
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn fingerprint(&self) -> Option<String> {
        self.inner.fingerprint()
    }
}
