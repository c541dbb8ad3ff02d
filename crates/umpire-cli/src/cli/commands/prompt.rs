use crate::cli::args::PromptArgs;
use crate::exit_codes::EXIT_SUCCESS;
use umpire_core::judge::render_prompt;
use umpire_core::model::{RoundRequest, SessionState};

pub fn cmd_prompt(args: PromptArgs) -> anyhow::Result<i32> {
    let state = SessionState {
        round: args.round,
        user_bomb_used: args.bomb_used,
    };
    let request = RoundRequest {
        user_input: args.input,
        bot_move: args.bot_move,
    };
    print!("{}", render_prompt(&state, &request));
    Ok(EXIT_SUCCESS)
}
