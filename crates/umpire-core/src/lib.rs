//! Rock-Paper-Scissors Plus rounds adjudicated by an external language model.
//!
//! The crate never decides a round itself. It renders the rules and the
//! session state into a prompt, hands it to an [`providers::llm::LlmClient`],
//! checks that the reply is a well-formed [`model::Verdict`], and only then
//! moves the session forward.

pub mod config;
pub mod errors;
pub mod judge;
pub mod model;
pub mod providers;
pub mod vcr;

pub use errors::JudgeError;
pub use judge::Judge;
pub use model::{Move, MoveStatus, RoundWinner, SessionState, Verdict};
