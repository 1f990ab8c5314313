use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::prompt_builder;
use super::LlmClient;
use crate::error::StageError;

const CHAT_TEMPERATURE: f32 = 0.7;

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI-based implementation of LlmClient.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(
        api_key: Option<String>,
        model: String,
        api_base_url: String,
        max_tokens: u32,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .expect("failed to build HTTP client");

        OpenAiClient {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            max_tokens,
        }
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }

    fn call_chat(&self, api_key: &str, req: &ChatRequest) -> Result<String> {
        let url = self.chat_url();

        log::info!("Calling OpenAI model {:?}", &req.model);
        if let Ok(body) = serde_json::to_string(req) {
            log::trace!("Chat request body: {body}");
        }

        let resp = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(req)
            .send()
            .context("failed to send request to OpenAI")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(anyhow!(
                "OpenAI API error: HTTP {} - {}",
                status.as_u16(),
                text
            ));
        }

        let chat_resp: ChatResponse = resp.json().context("failed to parse OpenAI response")?;
        let content = chat_resp
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow!("no choices returned from OpenAI"))?;

        if let Some(usage) = &chat_resp.usage {
            log::info!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(content.trim().to_string())
    }
}

impl LlmClient for OpenAiClient {
    fn generate_changelog(&self, diff: &str) -> Result<String, StageError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(StageError::CredentialMissing)?;

        let prompts = prompt_builder::changelog_prompt(diff);

        log::debug!("Changelog prompt:\n{}", truncate(&prompts.user, 3000));

        let req = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: prompts.system,
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompts.user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: CHAT_TEMPERATURE,
        };

        // Diagnostic only; the estimate never gates or truncates the request.
        log::info!(
            "Estimated prompt size: ~{} tokens",
            estimate_tokens(&req.messages)
        );

        self.call_chat(api_key, &req)
            .map_err(|e| StageError::RemoteCall(format!("{e:#}")))
    }
}

/// Estimate tokens across message bodies (rough approximation: ~4 chars per token).
fn estimate_tokens(messages: &[ChatMessage]) -> usize {
    messages.iter().map(|m| m.content.len() / 4).sum()
}

/// Truncate long strings for debug logging.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...\n[truncated {} chars]", &s[..max_len], s.len() - max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> ChatMessage {
        ChatMessage {
            role: "user".into(),
            content: content.into(),
        }
    }

    #[test]
    fn chat_url_appends_v1() {
        let client = OpenAiClient::new(None, "gpt-4".into(), "https://api.openai.com".into(), 4096);
        assert_eq!(
            client.chat_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn chat_url_respects_existing_v1() {
        let client = OpenAiClient::new(None, "gpt-4".into(), "http://localhost:8080/v1/".into(), 4096);
        assert_eq!(
            client.chat_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let client = OpenAiClient::new(None, "gpt-4".into(), "https://api.openai.com".into(), 4096);
        let err = client.generate_changelog("+ added Foo() method").unwrap_err();
        assert!(matches!(err, StageError::CredentialMissing));
    }

    #[test]
    fn token_estimate_sums_message_bodies() {
        let messages = vec![message("abcdefgh"), message("12345678")];
        assert_eq!(estimate_tokens(&messages), 4);
    }

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate("short", 100), "short");
    }

    #[test]
    fn truncate_reports_cut_length() {
        let out = truncate(&"x".repeat(120), 100);
        assert!(out.contains("[truncated 20 chars]"));
    }
}
