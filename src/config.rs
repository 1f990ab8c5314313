use std::env;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::cli_args::Cli;

/// Final resolved configuration for changelogbot.
#[derive(Debug, Clone)]
pub struct Config {
    /// None is not fatal here; only the generation stage needs the key.
    pub openai_api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub max_tokens: u32,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--api-key`)
    ///   2. Env vars `CHANGELOGBOT_MODEL` / `OPENAI_API_KEY`
    ///   3. TOML `~/.config/changelogbot.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Self {
        let file_cfg = load_file_config().unwrap_or_default();

        let model = cli
            .model
            .clone()
            .or_else(|| env::var("CHANGELOGBOT_MODEL").ok())
            .or(file_cfg.model)
            .unwrap_or_else(|| "gpt-4".to_string());

        // clap already consulted OPENAI_API_KEY for --api-key.
        let openai_api_key = cli.api_key.clone().or(file_cfg.openai_api_key);

        let api_base_url = file_cfg
            .api_base_url
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        let max_tokens = file_cfg.max_tokens.unwrap_or(4096);

        Config {
            openai_api_key,
            model,
            api_base_url,
            max_tokens,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Return `~/.config/changelogbot.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("changelogbot.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    toml::from_str::<FileConfig>(&data).ok()
}
