mod judge_internal;

use crate::errors::JudgeError;
use crate::model::{GenerationConfig, Move, RoundRequest, SessionState, Verdict};
use crate::providers::llm::LlmClient;
use std::sync::Arc;
use uuid::Uuid;

/// One game session: a provider handle plus the round counter and bomb flag
/// threaded between calls.
///
/// Rounds are strictly sequential (`judge_round` takes `&mut self`) and the
/// state only moves after a reply has been fully parsed, so a failed round can
/// simply be called again.
pub struct Judge {
    client: Arc<dyn LlmClient>,
    generation: GenerationConfig,
    state: SessionState,
    session_id: Uuid,
}

impl Judge {
    pub fn new(client: Arc<dyn LlmClient>, generation: GenerationConfig) -> Self {
        Self {
            client,
            generation,
            state: SessionState::default(),
            session_id: Uuid::new_v4(),
        }
    }

    /// Start from an explicit state instead of round 1.
    pub fn with_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    pub async fn judge_round(
        &mut self,
        user_input: &str,
        bot_move: Move,
    ) -> Result<Verdict, JudgeError> {
        let request = RoundRequest {
            user_input: user_input.to_string(),
            bot_move,
        };
        judge_internal::run::judge_round_impl(self, request).await
    }
}

/// The exact prompt a round with `state` and `request` would send.
pub fn render_prompt(state: &SessionState, request: &RoundRequest) -> String {
    judge_internal::prompt::render_prompt_impl(state, request)
}

/// Parse a provider reply on its own, without touching any session.
pub fn parse_verdict(text: &str) -> Result<Verdict, JudgeError> {
    judge_internal::client::parse_verdict_impl(text)
}
