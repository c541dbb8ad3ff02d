use super::LlmClient;
use crate::model::{GenerationConfig, LlmResponse};
use crate::vcr::{VcrClient, VcrMode};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const API_KEY_ENV: &str = "GENAI_API_KEY";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    pub model: String,
    api_key: String,
    pub client: reqwest::Client,
    /// Optional VCR client for record/replay (shared, requires mutex for async)
    vcr: Option<Arc<Mutex<VcrClient>>>,
}

impl GeminiClient {
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

    /// Create from environment (enables VCR when UMPIRE_VCR_MODE is record or replay)
    pub fn from_env(model: String, api_key: String) -> Self {
        if VcrMode::from_env() != VcrMode::Off {
            let vcr = VcrClient::from_env();
            Self::with_vcr(model, api_key, Arc::new(Mutex::new(vcr)))
        } else {
            Self::new(model, api_key)
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", BASE_URL, self.model)
    }
}

pub(crate) fn request_body(prompt: &str, config: &GenerationConfig) -> serde_json::Value {
    let mut generation = json!({ "temperature": config.temperature });
    if config.json_output {
        generation["responseMimeType"] = json!("application/json");
    }
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": generation,
    })
}

/// Concatenated text of the first candidate.
pub(crate) fn extract_text(body: &serde_json::Value) -> anyhow::Result<String> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            let reason = body
                .pointer("/candidates/0/finishReason")
                .or_else(|| body.pointer("/promptFeedback/blockReason"))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            anyhow::anyhow!("Gemini API response missing content (reason: {})", reason)
        })?;

    Ok(parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect())
}

pub(crate) fn usage_meta(body: &serde_json::Value) -> serde_json::Value {
    let Some(usage) = body.get("usageMetadata") else {
        return json!({});
    };
    json!({
        "usage": {
            "input_tokens": usage.get("promptTokenCount"),
            "output_tokens": usage.get("candidatesTokenCount"),
        }
    })
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> anyhow::Result<LlmResponse> {
        let url = self.endpoint();
        let body = request_body(prompt, config);

        let json: serde_json::Value = if let Some(vcr) = &self.vcr {
            let mut vcr_guard = vcr.lock().await;
            let resp = vcr_guard
                .post_json(&url, &body, &[("x-goog-api-key", self.api_key.as_str())])
                .await?;

            if !resp.is_success() {
                anyhow::bail!(
                    "Gemini generateContent error (status {}): {}",
                    resp.status,
                    resp.body
                );
            }
            resp.body
        } else {
            crate::providers::network::check_outbound(&url)?;
            let resp = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                anyhow::bail!(
                    "Gemini generateContent error (status {}): {}",
                    status.as_u16(),
                    error_text
                );
            }

            resp.json().await?
        };

        Ok(LlmResponse {
            text: extract_text(&json)?,
            provider: "gemini".to_string(),
            model: self.model.clone(),
            cached: false,
            meta: usage_meta(&json),
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn fingerprint(&self) -> Option<String> {
        Some(format!("gemini:{}", self.model))
    }
}
