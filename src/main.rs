mod changelog;
mod cli_args;
mod config;
mod error;
mod git;
mod llm;
mod logging;
mod setup;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indicatif::ProgressBar;

use cli_args::{Cli, Strategy};
use error::StageError;
use git::{FixedWindow, LatestCommit, RangePolicy};
use llm::LlmClient;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let cfg = config::Config::from_sources(&cli);
    let client = setup::build_llm_client(&cfg, cli.no_model);

    let policy: Box<dyn RangePolicy> = match cli.strategy {
        Strategy::Window => Box::new(FixedWindow {
            commits: cli.commits,
        }),
        Strategy::Latest => Box::new(LatestCommit),
    };

    let failed = run(&cli, policy.as_ref(), client.as_ref());

    // Best-effort by default: a failed stage is reported but does not fail
    // the run unless --strict-exit asked for it.
    if failed && cli.strict_exit {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the pipeline stages in order: collect, build prompt, generate, write.
///
/// Every stage returns a tagged result; this is the only place failures are
/// logged and degraded. Returns whether any stage failed.
fn run(cli: &Cli, policy: &dyn RangePolicy, client: &dyn LlmClient) -> bool {
    let mut failed = false;

    let root = match git::repo_root() {
        Ok(root) => Some(root),
        Err(e) => {
            log::error!("Failed to locate repository: {e}");
            failed = true;
            None
        }
    };

    let diff = match &root {
        Some(root) => match policy.collect_diff(root, &cli.suffix) {
            Ok(diff) => diff,
            Err(e) => {
                log::error!("Failed to collect diff: {e}");
                failed = true;
                String::new()
            }
        },
        None => String::new(),
    };

    if diff.trim().is_empty() {
        println!("No diffs found to process.");
        return failed;
    }

    let summary = match generate_with_spinner(client, &diff) {
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed to generate changelog: {e}");
            failed = true;
            llm::FAILURE_TEXT.to_string()
        }
    };

    println!("Generated Changelog:\n");
    println!("{summary}");

    // The writer runs unconditionally once generation completed, failure
    // text included.
    let path = changelog_path(root.as_deref(), &cli.changelog);
    match changelog::append_entry(&path, &summary) {
        Ok(()) => println!("Changelog written to {}", path.display()),
        Err(e) => {
            log::error!("Failed to write {}: {e}", path.display());
            failed = true;
        }
    }

    failed
}

fn generate_with_spinner(client: &dyn LlmClient, diff: &str) -> Result<String, StageError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Generating changelog...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = llm::generate(client, diff);
    spinner.finish_and_clear();
    result
}

/// A relative changelog path lands at the repository root, not wherever the
/// tool happened to be invoked from.
fn changelog_path(root: Option<&Path>, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        return configured.to_path_buf();
    }
    match root {
        Some(root) => root.join(configured),
        None => configured.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_changelog_resolves_against_root() {
        let path = changelog_path(Some(Path::new("/repo")), Path::new("CHANGELOG.md"));
        assert_eq!(path, PathBuf::from("/repo/CHANGELOG.md"));
    }

    #[test]
    fn absolute_changelog_is_used_as_given() {
        let path = changelog_path(Some(Path::new("/repo")), Path::new("/tmp/log.md"));
        assert_eq!(path, PathBuf::from("/tmp/log.md"));
    }
}
