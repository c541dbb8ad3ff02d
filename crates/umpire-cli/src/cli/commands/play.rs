use super::runner_builder::build_judge;
use crate::cli::args::{JudgeArgs, PlayArgs};
use crate::exit_codes::{EXIT_JUDGMENT_FAILED, EXIT_SUCCESS};
use rand::seq::SliceRandom;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use umpire_core::Move;

fn random_move() -> Move {
    *Move::ALL
        .choose(&mut rand::thread_rng())
        .unwrap_or(&Move::Rock)
}

/// Next stdin line with the terminator stripped. Bytes that are not UTF-8 are
/// replaced, so any free text still makes a round.
async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&buf[..]);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "quit" | "exit")
}

pub async fn cmd_play(judge_args: &JudgeArgs, args: PlayArgs) -> anyhow::Result<i32> {
    let mut judge = build_judge(judge_args)?;
    let interactive = std::io::stdin().is_terminal();
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let mut failed_rounds = 0u32;
    let mut io_failed = false;

    loop {
        if interactive {
            eprint!("round {}> ", judge.state().round);
            let _ = std::io::stderr().flush();
        }
        let line = match read_line(&mut reader, &mut buf).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("error: failed to read input: {}", e);
                io_failed = true;
                break;
            }
        };
        if is_quit(&line) {
            break;
        }

        let bot_move = args.bot_move.unwrap_or_else(random_move);
        match judge.judge_round(&line, bot_move).await {
            Ok(verdict) => {
                if let Err(e) = super::print_verdict(&verdict) {
                    eprintln!("error: failed to write verdict: {:#}", e);
                    io_failed = true;
                    break;
                }
            }
            Err(e) => {
                failed_rounds += 1;
                eprintln!(
                    "error: round {} not judged [{}]: {} (state unchanged, try again)",
                    judge.state().round,
                    e.code(),
                    e
                );
            }
        }
    }

    let state = judge.state();
    tracing::info!(
        session_id = %judge.session_id(),
        rounds_played = state.round - 1,
        bomb_used = state.user_bomb_used,
        failed_rounds,
        io_failed,
        "session over"
    );

    if failed_rounds > 0 || io_failed {
        Ok(EXIT_JUDGMENT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
