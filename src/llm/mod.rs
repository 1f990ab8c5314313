pub mod openai;
mod prompt_builder;
mod prompts;

use crate::error::StageError;
use crate::git;

/// Substituted by the caller whenever generation fails.
pub const FAILURE_TEXT: &str = "Failed to generate changelog.";

/// Written when the collected diff carried no meaningful changes.
pub const NO_CHANGES_TEXT: &str = "No significant changes detected.";

/// Trait for talking to an LLM (real backend or dummy).
pub trait LlmClient: Send + Sync {
    /// Generate a categorized changelog for the given diff.
    fn generate_changelog(&self, diff: &str) -> Result<String, StageError>;
}

/// Run the generation stage for a collected diff.
///
/// Empty and sentinel diffs short-circuit to the fixed no-changes text
/// without touching the backend.
pub fn generate(client: &dyn LlmClient, diff: &str) -> Result<String, StageError> {
    let trimmed = diff.trim();
    if trimmed.is_empty() || trimmed == git::NO_CHANGES_SENTINEL {
        log::info!("No meaningful diffs to process.");
        return Ok(NO_CHANGES_TEXT.to_string());
    }

    client.generate_changelog(diff)
}

/// No-op / dummy model client for development with --no-model.
pub struct NoopClient;

impl LlmClient for NoopClient {
    fn generate_changelog(&self, diff: &str) -> Result<String, StageError> {
        Ok(format!(
            "Dummy changelog for testing\n\n- Updated: {} byte diff (LLM disabled)",
            diff.len()
        ))
    }
}
