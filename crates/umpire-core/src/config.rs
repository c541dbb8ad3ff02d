use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// On-disk judge settings (`umpire.yaml`). Every field is optional so that a
/// file only has to name what it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub version: u32,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Resolved settings for one judge session.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl JudgeConfig {
    /// Layer a config file over the defaults.
    pub fn from_file(file: &FileConfig) -> Self {
        let mut cfg = Self::default();
        if let Some(p) = &file.provider {
            cfg.provider = p.clone();
        }
        if let Some(m) = &file.model {
            cfg.model = m.clone();
        }
        if let Some(t) = file.temperature {
            cfg.temperature = t;
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError("model identifier must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError(format!(
                "temperature {} out of range (expected 0.0..=2.0)",
                self.temperature
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    let cfg: FileConfig = serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    Ok(cfg)
}
