use std::io::Write;
use super::args::*;

pub mod demo;
pub mod play;
pub mod prompt;
pub(crate) mod runner_builder;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Demo => demo::cmd_demo(&cli.judge).await,
        Command::Play(args) => play::cmd_play(&cli.judge, args).await,
        Command::Prompt(args) => prompt::cmd_prompt(args),
    }
}

pub(crate) fn print_verdict(verdict: &umpire_core::Verdict) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string_pretty(verdict)?)?;
    Ok(())
}
