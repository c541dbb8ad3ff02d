//! Round judging internals.
//!
//! - run.rs: orchestration of one round and the state hand-off
//! - prompt.rs: prompt constants and rendering only
//! - client.rs: provider call + response parse boundary

pub(crate) mod client;
pub(crate) mod prompt;
pub(crate) mod run;
