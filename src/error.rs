use std::io;

use thiserror::Error;

/// Tagged failure reasons for each pipeline stage. Stages return these as
/// values; only the top-level run function logs them and decides what the
/// failure means for the run.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("git is not installed or not available in PATH")]
    ToolUnavailable,
    #[error("git command failed: {0}")]
    Subprocess(String),
    #[error("no API key found; set OPENAI_API_KEY, pass --api-key, or add it to the config file")]
    CredentialMissing,
    #[error("chat completion request failed: {0}")]
    RemoteCall(String),
    #[error("changelog write failed: {0}")]
    FileWrite(#[from] io::Error),
}
