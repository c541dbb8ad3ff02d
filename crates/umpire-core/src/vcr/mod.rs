//! VCR (Video Cassette Recording) middleware for provider HTTP calls.
//!
//! Lets judge sessions be replayed deterministically without network access.
//!
//! # Environment Variables
//!
//! - `UMPIRE_VCR_MODE`: `off` (default, live network), `record`, `replay`
//! - `UMPIRE_VCR_DIR`: cassette directory (default: `tests/fixtures/vcr`)
//!
//! # Matching
//!
//! Requests are matched by method + URL + body (JCS-canonical JSON). Headers,
//! and with them API keys, are never part of the fingerprint or the cassette.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const VCR_MODE_ENV: &str = "UMPIRE_VCR_MODE";
pub const VCR_DIR_ENV: &str = "UMPIRE_VCR_DIR";
pub const DEFAULT_CASSETTE_DIR: &str = "tests/fixtures/vcr";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VcrMode {
    /// Pass through to the live network; nothing is written.
    #[default]
    Off,
    /// Make real requests and save every exchange.
    Record,
    /// Serve from cassettes only; a miss is an error.
    Replay,
}

impl VcrMode {
    pub fn from_env() -> Self {
        match env::var(VCR_MODE_ENV)
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "record" => VcrMode::Record,
            "replay" => VcrMode::Replay,
            _ => VcrMode::Off,
        }
    }
}

/// A recorded request/response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CassetteEntry {
    pub method: String,
    pub url: String,
    pub request_body: Option<serde_json::Value>,
    pub status: u16,
    pub response_body: serde_json::Value,
    pub fingerprint: String,
}

pub struct VcrClient {
    mode: VcrMode,
    cassette_dir: PathBuf,
    cache: HashMap<String, CassetteEntry>,
    inner: reqwest::Client,
}

impl VcrClient {
    pub fn from_env() -> Self {
        let mode = VcrMode::from_env();
        let cassette_dir = env::var(VCR_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CASSETTE_DIR));

        Self::new(mode, cassette_dir)
    }

    pub fn new(mode: VcrMode, cassette_dir: PathBuf) -> Self {
        let mut client = Self {
            mode,
            cassette_dir,
            cache: HashMap::new(),
            inner: reqwest::Client::new(),
        };

        if mode == VcrMode::Replay {
            client.load_cassettes();
        }

        client
    }

    pub fn fingerprint(method: &str, url: &str, body: Option<&serde_json::Value>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        if let Some(b) = body {
            let canonical = serde_jcs::to_string(b).unwrap_or_else(|_| b.to_string());
            hasher.update(canonical.as_bytes());
        }

        hex::encode(hasher.finalize())
    }

    fn load_cassettes(&mut self) {
        let cassette_dir = self.cassette_dir.clone();
        if !cassette_dir.exists() {
            return;
        }

        for subdir in ["gemini", "openai", "other"] {
            let dir = cassette_dir.join(subdir);
            if dir.exists() {
                self.load_cassettes_from_dir(&dir);
            }
        }
        self.load_cassettes_from_dir(&cassette_dir);
    }

    fn load_cassettes_from_dir(&mut self, dir: &Path) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let parsed = fs::read_to_string(&path)
                    .ok()
                    .and_then(|c| serde_json::from_str::<CassetteEntry>(&c).ok());
                match parsed {
                    Some(cassette) => {
                        self.cache.insert(cassette.fingerprint.clone(), cassette);
                    }
                    None => tracing::warn!(path = %path.display(), "VCR: skipping unreadable cassette"),
                }
            }
        }
    }

    fn save_cassette(&self, entry: &CassetteEntry, category: &str) -> anyhow::Result<()> {
        let dir = self.cassette_dir.join(category);
        fs::create_dir_all(&dir)?;

        let fp_prefix = entry.fingerprint.get(..16).unwrap_or(&entry.fingerprint);
        let path = dir.join(format!("{}.json", fp_prefix));

        let content = serde_json::to_string_pretty(entry)?;
        fs::write(path, content)?;

        Ok(())
    }

    fn category_from_url(url: &str) -> &'static str {
        if url.contains("generativelanguage.googleapis.com") {
            "gemini"
        } else if url.contains("api.openai.com") {
            "openai"
        } else {
            "other"
        }
    }

    /// POST a JSON body, honouring the configured mode. `headers` are sent on
    /// live requests only.
    pub async fn post_json(
        &mut self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(&str, &str)],
    ) -> anyhow::Result<VcrResponse> {
        let fingerprint = Self::fingerprint("POST", url, Some(body));

        match self.mode {
            VcrMode::Replay => match self.cache.get(&fingerprint) {
                Some(entry) => Ok(VcrResponse {
                    status: entry.status,
                    body: entry.response_body.clone(),
                }),
                None => anyhow::bail!(
                    "VCR replay: no cassette found for POST {} (fingerprint: {}). \
                     Run with {}=record to record responses.",
                    url,
                    &fingerprint[..16],
                    VCR_MODE_ENV
                ),
            },
            VcrMode::Record => {
                let resp = self.send_live(url, body, headers).await?;

                let entry = CassetteEntry {
                    method: "POST".to_string(),
                    url: url.to_string(),
                    request_body: Some(body.clone()),
                    status: resp.status,
                    response_body: resp.body.clone(),
                    fingerprint: fingerprint.clone(),
                };

                if let Err(e) = self.save_cassette(&entry, Self::category_from_url(url)) {
                    tracing::warn!("VCR: failed to save cassette: {}", e);
                }
                self.cache.insert(fingerprint, entry);

                Ok(resp)
            }
            VcrMode::Off => self.send_live(url, body, headers).await,
        }
    }

    async fn send_live(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(&str, &str)],
    ) -> anyhow::Result<VcrResponse> {
        crate::providers::network::check_outbound(url)?;
        let mut req = self.inner.post(url).json(body);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        // Error pages are not always JSON; keep them as a string body.
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        Ok(VcrResponse { status, body })
    }

    pub fn mode(&self) -> VcrMode {
        self.mode
    }

    pub fn cassette_count(&self) -> usize {
        self.cache.len()
    }
}

#[derive(Debug)]
pub struct VcrResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl VcrResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/m:generateContent";

    #[test]
    fn fingerprint_ignores_key_order() {
        let a = json!({"contents": [{"parts": [{"text": "hi"}]}], "generationConfig": {"temperature": 0.2}});
        let b = json!({"generationConfig": {"temperature": 0.2}, "contents": [{"parts": [{"text": "hi"}]}]});
        assert_eq!(
            VcrClient::fingerprint("POST", GEMINI_URL, Some(&a)),
            VcrClient::fingerprint("POST", GEMINI_URL, Some(&b))
        );

        let c = json!({"contents": [{"parts": [{"text": "bye"}]}]});
        assert_ne!(
            VcrClient::fingerprint("POST", GEMINI_URL, Some(&a)),
            VcrClient::fingerprint("POST", GEMINI_URL, Some(&c))
        );
    }

    #[test]
    #[serial(vcr_env)]
    fn mode_from_env_defaults_off() {
        env::remove_var(VCR_MODE_ENV);
        assert_eq!(VcrMode::from_env(), VcrMode::Off);

        env::set_var(VCR_MODE_ENV, "REPLAY");
        assert_eq!(VcrMode::from_env(), VcrMode::Replay);

        env::set_var(VCR_MODE_ENV, "record");
        assert_eq!(VcrMode::from_env(), VcrMode::Record);

        env::remove_var(VCR_MODE_ENV);
    }

    #[tokio::test]
    async fn replay_serves_saved_cassette() {
        let tmp = TempDir::new().unwrap();
        let body = json!({"contents": [{"parts": [{"text": "judge this"}]}]});
        let fingerprint = VcrClient::fingerprint("POST", GEMINI_URL, Some(&body));

        let recorder = VcrClient::new(VcrMode::Record, tmp.path().to_path_buf());
        let entry = CassetteEntry {
            method: "POST".to_string(),
            url: GEMINI_URL.to_string(),
            request_body: Some(body.clone()),
            status: 200,
            response_body: json!({"candidates": []}),
            fingerprint,
        };
        recorder.save_cassette(&entry, "gemini").unwrap();
        assert!(tmp.path().join("gemini").exists());

        let mut replay = VcrClient::new(VcrMode::Replay, tmp.path().to_path_buf());
        assert_eq!(replay.cassette_count(), 1);
        let resp = replay
            .post_json(GEMINI_URL, &body, &[("x-goog-api-key", "secret")])
            .await
            .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.body, json!({"candidates": []}));
    }

    #[tokio::test]
    async fn replay_miss_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut replay = VcrClient::new(VcrMode::Replay, tmp.path().to_path_buf());
        let err = replay
            .post_json(GEMINI_URL, &json!({"x": 1}), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no cassette found"));
    }
}
