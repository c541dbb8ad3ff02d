use super::LlmClient;
use crate::model::{GenerationConfig, LlmResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Offline provider. Serves scripted replies in order, then falls back to a
/// fixed reply if one is set. Every prompt it receives is kept for inspection.
#[derive(Debug)]
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
    script: Mutex<VecDeque<anyhow::Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(model: String) -> Self {
        Self {
            model,
            fixed_response: None,
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: String) -> Self {
        self.fixed_response = Some(response);
        self
    }

    /// Queue replies to be served one per call, before the fixed response.
    pub fn with_script<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut script = self.script.lock().unwrap_or_else(|p| p.into_inner());
            script.extend(replies.into_iter().map(|r| Ok(r.into())));
        }
        self
    }

    /// Queue a transport-level failure.
    pub fn push_error(&self, message: impl Into<String>) {
        let mut script = self.script.lock().unwrap_or_else(|p| p.into_inner());
        script.push_back(Err(anyhow::anyhow!(message.into())));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> anyhow::Result<LlmResponse> {
        self.prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(prompt.to_string());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front();

        let text = match scripted {
            Some(reply) => reply?,
            None => self
                .fixed_response
                .clone()
                .ok_or_else(|| anyhow::anyhow!("fake provider has no more scripted replies"))?,
        };

        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
            cached: false,
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn fingerprint(&self) -> Option<String> {
        Some(format!("fake:{}", self.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_then_fixed_then_exhausted() {
        let cfg = GenerationConfig::default();
        let client = FakeClient::new("m".into()).with_script(["one", "two"]);
        client.push_error("boom");

        assert_eq!(client.complete("a", &cfg).await.unwrap().text, "one");
        assert_eq!(client.complete("b", &cfg).await.unwrap().text, "two");
        assert!(client.complete("c", &cfg).await.unwrap_err().to_string().contains("boom"));
        assert!(client.complete("d", &cfg).await.is_err());
        assert_eq!(client.prompts(), vec!["a", "b", "c", "d"]);

        let fixed = FakeClient::new("m".into()).with_response("same".into());
        assert_eq!(fixed.complete("x", &cfg).await.unwrap().text, "same");
        assert_eq!(fixed.complete("y", &cfg).await.unwrap().text, "same");
    }
}
