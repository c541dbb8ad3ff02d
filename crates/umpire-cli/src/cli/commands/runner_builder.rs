use super::super::args::JudgeArgs;
use anyhow::Context;
use std::sync::Arc;
use umpire_core::config::{load_config, FileConfig, JudgeConfig};
use umpire_core::model::GenerationConfig;
use umpire_core::providers::llm::fake::FakeClient;
use umpire_core::providers::llm::gemini::{self, GeminiClient};
use umpire_core::providers::llm::openai::{self, OpenAIClient};
use umpire_core::providers::llm::tracing::TracingLlmClient;
use umpire_core::providers::llm::LlmClient;
use umpire_core::vcr::VcrMode;
use umpire_core::Judge;

/// Flags (and their env fallbacks) over the config file over the defaults.
pub(crate) fn resolve_config(args: &JudgeArgs) -> anyhow::Result<JudgeConfig> {
    let file = match &args.config {
        Some(path) => load_config(path).map_err(|e| anyhow::anyhow!("{}", e))?,
        None => FileConfig::default(),
    };
    let mut cfg = JudgeConfig::from_file(&file);

    if let Some(p) = &args.provider {
        cfg.provider = p.clone();
    }
    if let Some(m) = &args.model {
        cfg.model = m.clone();
    }
    if let Some(t) = args.temperature {
        cfg.temperature = t;
    }

    cfg.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(cfg)
}

fn api_key(args: &JudgeArgs, env_var: &str) -> anyhow::Result<String> {
    if let Some(k) = &args.api_key {
        return Ok(k.clone());
    }
    match std::env::var(env_var) {
        Ok(k) if !k.trim().is_empty() => Ok(k),
        // replay never reaches the network, so no credential is needed
        _ if VcrMode::from_env() == VcrMode::Replay => Ok("replay-placeholder".to_string()),
        _ => anyhow::bail!(
            "config error: judge provider needs an API key; set {} or pass --api-key",
            env_var
        ),
    }
}

pub(crate) fn build_client(
    args: &JudgeArgs,
    cfg: &JudgeConfig,
) -> anyhow::Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match cfg.provider.as_str() {
        "gemini" => Arc::new(GeminiClient::from_env(
            cfg.model.clone(),
            api_key(args, gemini::API_KEY_ENV)?,
        )),
        "openai" => Arc::new(OpenAIClient::from_env(
            cfg.model.clone(),
            api_key(args, openai::API_KEY_ENV)?,
        )),
        "fake" => {
            let path = args
                .fake_response
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("config error: --provider fake requires --fake-response <FILE>"))?;
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read fake response {}", path.display()))?;
            Arc::new(FakeClient::new(cfg.model.clone()).with_response(text))
        }
        other => anyhow::bail!(
            "config error: unknown judge provider: {} (expected gemini, openai or fake)",
            other
        ),
    };

    Ok(Arc::new(TracingLlmClient::new(client)))
}

pub(crate) fn build_judge(args: &JudgeArgs) -> anyhow::Result<Judge> {
    let cfg = resolve_config(args)?;
    let client = build_client(args, &cfg)?;
    let judge = Judge::new(
        client,
        GenerationConfig {
            temperature: cfg.temperature,
            json_output: true,
        },
    );
    tracing::debug!(
        session_id = %judge.session_id(),
        provider = %cfg.provider,
        model = %cfg.model,
        "judge session created"
    );
    Ok(judge)
}
