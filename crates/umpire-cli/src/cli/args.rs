use clap::{Parser, Subcommand};
use std::path::PathBuf;
use umpire_core::Move;

#[derive(Parser)]
#[command(
    name = "umpire",
    version,
    about = "Rock-Paper-Scissors Plus, refereed by a language model"
)]
pub struct Cli {
    #[command(flatten)]
    pub judge: JudgeArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Play the three scripted sample rounds
    Demo,
    /// Interactive session: one line of stdin per round
    Play(PlayArgs),
    /// Print the prompt a round would send, without calling any provider
    Prompt(PromptArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct JudgeArgs {
    /// YAML config file (version: 1; provider, model, temperature)
    #[arg(long, global = true, env = "UMPIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Judge provider
    /// - gemini: Google Generative Language API (GENAI_API_KEY)
    /// - openai: OpenAI chat completions (OPENAI_API_KEY)
    /// - fake: fixed reply from --fake-response (tests/dev)
    #[arg(long, global = true, env = "UMPIRE_PROVIDER")]
    pub provider: Option<String>,

    /// Model identifier (provider-specific)
    /// Default: gemini-3-flash-preview
    #[arg(long, global = true, env = "UMPIRE_MODEL")]
    pub model: Option<String>,

    /// Sampling temperature for judge calls
    /// Default: 0.2
    #[arg(long, global = true, env = "UMPIRE_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// API key; falls back to the provider's environment variable
    #[arg(long, global = true, hide = true)]
    pub api_key: Option<String>,

    /// File whose content the fake provider returns for every round
    #[arg(long, global = true)]
    pub fake_response: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PlayArgs {
    /// Fix the bot's move for every round (default: random each round)
    #[arg(long)]
    pub bot_move: Option<Move>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PromptArgs {
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub round: u32,

    /// Render the state as if the user's bomb is already spent
    #[arg(long)]
    pub bomb_used: bool,

    #[arg(long)]
    pub bot_move: Move,

    /// The player's free-text move
    #[arg(long, allow_hyphen_values = true)]
    pub input: String,
}
