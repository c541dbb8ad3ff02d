use crate::errors::JudgeError;
use crate::judge::Judge;
use crate::model::{RoundRequest, Verdict};
use tracing::{info_span, Instrument};

pub(crate) async fn judge_round_impl(
    judge: &mut Judge,
    request: RoundRequest,
) -> Result<Verdict, JudgeError> {
    let state = judge.state;
    let span = info_span!(
        "umpire.round",
        session_id = %judge.session_id,
        round = state.round,
        bomb_used = state.user_bomb_used,
        bot_move = %request.bot_move,
        provider = judge.client.provider_name(),
    );

    async {
        let prompt = super::prompt::render_prompt_impl(&state, &request);
        let text = super::client::call_judge_impl(judge, &prompt).await?;

        let verdict = super::client::parse_verdict_impl(&text).inspect_err(|e| {
            tracing::warn!(code = e.code(), "round not applied: {}", e);
        })?;

        if verdict.round != state.round {
            tracing::warn!(
                echoed = verdict.round,
                tracked = state.round,
                "judge echoed a different round number; keeping tracked counter"
            );
        }

        judge.state = state.advance(&verdict.state_update);
        tracing::info!(
            move_status = ?verdict.move_status,
            winner = ?verdict.round_winner,
            bomb_used = judge.state.user_bomb_used,
            "round judged"
        );
        Ok::<Verdict, JudgeError>(verdict)
    }
    .instrument(span)
    .await
}
