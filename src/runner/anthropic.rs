//! @ai:module:intent Anthropic Messages API adapter
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnthropicAdapter
//! @ai:module:stateless false

use crate::runner::client::{HttpContext, Provider, ProviderAdapter};
use crate::runner::rate_limiter::RateLimiterTrait;
use anyhow::Context;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// @ai:intent Adapter for Claude models over the Messages API
pub struct AnthropicAdapter {
    model: String,
    http: HttpContext,
}

impl AnthropicAdapter {
    pub fn new(model: String, http: HttpContext) -> Self {
        Self { model, http }
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> Provider {
        Provider::Anthropic
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
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.http.max_tokens,
            temperature: self.http.temperature,
            system,
            messages: [Message {
                role: "user",
                content: user_prompt,
            }],
        };

        let response = self
            .http
            .client
            .post(format!("{}/messages", Provider::Anthropic.api_base()))
            .header("x-api-key", &self.http.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({}): {}", status, body);
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        Ok(parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
