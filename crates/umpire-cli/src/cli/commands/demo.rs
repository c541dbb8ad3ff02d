use super::runner_builder::build_judge;
use crate::cli::args::JudgeArgs;
use crate::exit_codes::{EXIT_JUDGMENT_FAILED, EXIT_SUCCESS};
use umpire_core::Move;

/// Nuclear-option bomb, an illegal second bomb, then a vague answer.
pub(crate) const SCRIPTED_ROUNDS: [(&str, Move); 3] = [
    ("I choose the nuclear option", Move::Scissors),
    ("bomb again", Move::Rock),
    ("something sharp maybe", Move::Paper),
];

pub async fn cmd_demo(judge_args: &JudgeArgs) -> anyhow::Result<i32> {
    let mut judge = build_judge(judge_args)?;

    for (user_input, bot_move) in SCRIPTED_ROUNDS {
        match judge.judge_round(user_input, bot_move).await {
            Ok(verdict) => {
                if let Err(e) = super::print_verdict(&verdict) {
                    eprintln!("error: failed to write verdict: {:#}", e);
                    return Ok(EXIT_JUDGMENT_FAILED);
                }
            }
            Err(e) => {
                eprintln!(
                    "error: round {} failed [{}]: {}",
                    judge.state().round,
                    e.code(),
                    e
                );
                return Ok(EXIT_JUDGMENT_FAILED);
            }
        }
    }

    Ok(EXIT_SUCCESS)
}
