//! @ai:module:intent Google Gemini generateContent adapter
//! @ai:module:layer infrastructure
//! @ai:module:public_api GeminiAdapter
//! @ai:module:stateless false

use crate::runner::client::{HttpContext, Provider, ProviderAdapter};
use crate::runner::rate_limiter::RateLimiterTrait;
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// @ai:intent Adapter for Gemini models
pub struct GeminiAdapter {
    model: String,
    http: HttpContext,
}

impl GeminiAdapter {
    pub fn new(model: String, http: HttpContext) -> Self {
        Self { model, http }
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> Provider {
        Provider::Gemini
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
        let request = GenerateRequest {
            system_instruction: system.map(|text| Content {
                role: None,
                parts: [Part { text }],
            }),
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: user_prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.http.max_tokens,
                temperature: self.http.temperature,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            Provider::Gemini.api_base(),
            self.model
        );

        let response = self
            .http
            .client
            .post(url)
            .header("x-goog-api-key", &self.http.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, body);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .context("Response contained no candidates")?;

        Ok(candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}
