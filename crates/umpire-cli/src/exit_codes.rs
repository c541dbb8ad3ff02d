//! Process exit codes. Part of the CLI contract.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_JUDGMENT_FAILED: i32 = 1; // Provider error, bad verdict, or stdin/stdout failure mid-session
pub const EXIT_CONFIG_ERROR: i32 = 2; // Bad flags, config file or missing credentials
