use crate::llm::prompts;

pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Build the changelog prompt. Pure string assembly: the diff is embedded
/// verbatim, however large it is.
pub fn changelog_prompt(diff: &str) -> PromptPair {
    let system = prompts::CHANGELOG_SYSTEM.to_owned();

    let user = format!(
        "Generate a concise, categorized changelog based on the following code changes:\n\
         {diff}\n\n\
         {instructions}",
        diff = diff,
        instructions = prompts::CHANGELOG_INSTRUCTIONS
    );

    PromptPair { system, user }
}
