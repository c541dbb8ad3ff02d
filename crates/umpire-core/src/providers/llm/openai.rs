use super::LlmClient;
use crate::model::{GenerationConfig, LlmResponse};
use crate::vcr::{VcrClient, VcrMode};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible chat completions backend.
pub struct OpenAIClient {
    pub model: String,
    api_key: String,
    pub client: reqwest::Client,
    vcr: Option<Arc<Mutex<VcrClient>>>,
}

impl OpenAIClient {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            client: reqwest::Client::new(),
            vcr: None,
        }
    }

    pub fn with_vcr(model: String, api_key: String, vcr: Arc<Mutex<VcrClient>>) -> Self {
        Self {
            model,
            api_key,
            client: reqwest::Client::new(),
            vcr: Some(vcr),
        }
    }

    pub fn from_env(model: String, api_key: String) -> Self {
        if VcrMode::from_env() != VcrMode::Off {
            let vcr = VcrClient::from_env();
            Self::with_vcr(model, api_key, Arc::new(Mutex::new(vcr)))
        } else {
            Self::new(model, api_key)
        }
    }

    fn request_body(&self, prompt: &str, config: &GenerationConfig) -> serde_json::Value {
        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": config.temperature,
        });
        if config.json_output {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> anyhow::Result<LlmResponse> {
        let body = self.request_body(prompt, config);
        let auth = format!("Bearer {}", self.api_key);

        let json: serde_json::Value = if let Some(vcr) = &self.vcr {
            let mut vcr_guard = vcr.lock().await;
            let resp = vcr_guard
                .post_json(CHAT_URL, &body, &[("Authorization", auth.as_str())])
                .await?;

            if !resp.is_success() {
                anyhow::bail!(
                    "OpenAI chat API error (status {}): {}",
                    resp.status,
                    resp.body
                );
            }
            resp.body
        } else {
            crate::providers::network::check_outbound(CHAT_URL)?;
            let resp = self
                .client
                .post(CHAT_URL)
                .header("Authorization", auth)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                anyhow::bail!(
                    "OpenAI chat API error (status {}): {}",
                    status.as_u16(),
                    error_text
                );
            }

            resp.json().await?
        };

        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing content"))?
            .to_string();

        let meta = match json.get("usage") {
            Some(usage) => json!({
                "usage": {
                    "input_tokens": usage.get("prompt_tokens"),
                    "output_tokens": usage.get("completion_tokens"),
                }
            }),
            None => json!({}),
        };

        Ok(LlmResponse {
            text,
            provider: "openai".to_string(),
            model: self.model.clone(),
            cached: false,
            meta,
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn fingerprint(&self) -> Option<String> {
        Some(format!("openai:{}", self.model))
    }
}
