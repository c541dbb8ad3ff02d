use std::fmt::{Display, Formatter};

/// Why a round could not be applied. Every variant leaves the session state
/// exactly as it was before the call, so the same round can be retried.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    /// The provider answered, but not with JSON.
    #[error("malformed judgment: model did not return valid JSON ({detail})")]
    MalformedResponse { detail: String, raw: String },

    /// JSON parsed, but a required verdict field is missing or mistyped.
    #[error("incomplete verdict: {detail}")]
    IncompleteVerdict {
        detail: String,
        raw: serde_json::Value,
    },

    #[error("judge provider '{provider}' failed: {source:#}")]
    Provider {
        provider: String,
        #[source]
        source: anyhow::Error,
    },
}

impl JudgeError {
    pub fn malformed(detail: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
            raw: raw.into(),
        }
    }

    pub fn incomplete(detail: impl Into<String>, raw: serde_json::Value) -> Self {
        Self::IncompleteVerdict {
            detail: detail.into(),
            raw,
        }
    }

    pub fn provider(provider: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Provider {
            provider: provider.into(),
            source,
        }
    }

    /// Stable short code used in logs and CLI diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedResponse { .. } => "E_MALFORMED_JUDGMENT",
            Self::IncompleteVerdict { .. } => "E_INCOMPLETE_VERDICT",
            Self::Provider { .. } => "E_PROVIDER",
        }
    }
}

#[derive(Debug)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl std::error::Error for ConfigError {}
