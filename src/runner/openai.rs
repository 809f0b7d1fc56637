//! @ai:module:intent OpenAI-compatible chat-completions adapter (OpenAI, Mistral, DeepSeek)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OpenAiAdapter
//! @ai:module:stateless false

use crate::runner::client::{HttpContext, Provider, ProviderAdapter};
use crate::runner::rate_limiter::RateLimiterTrait;
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Message list for a chat request; the system turn is only sent when present.
fn chat_messages<'a>(user_prompt: &'a str, system: Option<&'a str>) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);

    if let Some(content) = system {
        messages.push(ChatMessage {
            role: "system",
            content,
        });
    }

    messages.push(ChatMessage {
        role: "user",
        content: user_prompt,
    });
    messages
}

/// @ai:intent Adapter for any provider speaking the chat-completions protocol
pub struct OpenAiAdapter {
    provider: Provider,
    model: String,
    http: HttpContext,
}

impl OpenAiAdapter {
    pub fn new(provider: Provider, model: String, http: HttpContext) -> Self {
        Self {
            provider,
            model,
            http,
        }
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    /// @ai:effects time, state:write
    async fn ready(&self) {
        self.http.rate_limiter.wait().await;
    }

    /// @ai:effects network
    async fn query(&self, user_prompt: &str, system: Option<&str>) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: chat_messages(user_prompt, system),
            max_tokens: self.http.max_tokens,
            temperature: self.http.temperature,
        };

        let response = self
            .http
            .client
            .post(format!("{}/chat/completions", self.provider.api_base()))
            .bearer_auth(&self.http.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {} API", self.provider))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} API error ({}): {}", self.provider, status, body);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} API response", self.provider))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Response contained no choices")
    }
}
