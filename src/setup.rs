use log::debug;

use crate::config::Config;
use crate::llm::openai::OpenAiClient;
use crate::llm::{LlmClient, NoopClient};

/// Build the LLM client based on CLI + config.
pub fn build_llm_client(cfg: &Config, no_model: bool) -> Box<dyn LlmClient> {
    if no_model {
        debug!("Using NoopClient (no model calls)");
        return Box::new(NoopClient);
    }

    debug!("Using OpenAiClient with model: {}", cfg.model);

    Box::new(OpenAiClient::new(
        cfg.openai_api_key.clone(),
        cfg.model.clone(),
        cfg.api_base_url.clone(),
        cfg.max_tokens,
    ))
}
