use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "changelogbot",
    version,
    about = "LLM-assisted changelog generator for recent Git history"
)]
pub struct Cli {
    /// How the commit range is chosen: last N commits, or the single latest
    /// commit touching a matching file
    #[arg(long, value_enum, default_value = "window")]
    pub strategy: Strategy,

    /// Number of commits to look back in window mode
    #[arg(long, default_value_t = 10)]
    pub commits: usize,

    /// File suffix the diff is restricted to (with or without the dot)
    #[arg(long, default_value = "cs")]
    pub suffix: String,

    /// Changelog file to append to; a relative path is resolved against the
    /// repository root
    #[arg(long, default_value = "CHANGELOG.md")]
    pub changelog: PathBuf,

    /// Model name to use (e.g. gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,

    /// Disable model calls; return dummy responses instead
    #[arg(long)]
    pub no_model: bool,

    /// API key (otherwise uses OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Exit non-zero when any stage fails instead of the default best-effort
    /// success exit
    #[arg(long)]
    pub strict_exit: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Strategy {
    /// Diff the last N commits against the working tree
    Window,
    /// Diff the latest matching commit against its parent
    Latest,
}
