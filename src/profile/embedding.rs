//! @ai:module:intent Generate profile embeddings through an external embedding API
//! @ai:module:layer infrastructure
//! @ai:module:public_api EmbeddingClient, OpenAiEmbeddingClient, MockEmbeddingClient, augment_profile
//! @ai:module:stateless true

use crate::profile::types::{Embedding, Profile, DEFAULT_PVS_VERSION};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// @ai:intent Anything able to turn text into a vector
#[allow(async_fn_in_trait)]
pub trait EmbeddingClient: Send + Sync {
    /// @ai:intent Identifier of the embedding model recorded in the profile
    fn model(&self) -> &str;

    /// @ai:intent Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// @ai:intent OpenAI embeddings endpoint client
pub struct OpenAiEmbeddingClient {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl OpenAiEmbeddingClient {
    /// @ai:intent Create a client using OPENAI_API_KEY
    /// @ai:pre OPENAI_API_KEY environment variable is set
    /// @ai:effects env
    pub fn from_env(model: Option<String>) -> Result<Self> {
        let api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set in environment")?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            model: model.unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            api_key,
        })
    }
}

impl EmbeddingClient for OpenAiEmbeddingClient {
    fn model(&self) -> &str {
        &self.model
    }

    /// @ai:intent Request an embedding vector for the given text
    /// @ai:effects network
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to embeddings API")?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Embeddings API error ({}): {}", status, error_text);
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embeddings API response")?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow::anyhow!("Embeddings API returned no data"))
    }
}

/// @ai:intent Deterministic embedding client for tests and dry runs
pub struct MockEmbeddingClient {
    dimensions: usize,
}

impl MockEmbeddingClient {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl EmbeddingClient for MockEmbeddingClient {
    fn model(&self) -> &str {
        "mock-embedding"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let seed = text.len() as f32;
        Ok((0..self.dimensions)
            .map(|i| ((seed + i as f32) % 10.0) / 10.0)
            .collect())
    }
}

/// @ai:intent Fill in version and embedding on a freshly authored profile
/// @ai:post returned profile has Some(embedding) and a non-empty pvs_version
/// @ai:effects network
pub async fn augment_profile<E: EmbeddingClient>(mut profile: Profile, client: &E) -> Result<Profile> {
    if profile.pvs_version.trim().is_empty() {
        profile.pvs_version = DEFAULT_PVS_VERSION.to_string();
    }

    let text = profile.embedding_text();
    tracing::info!(
        "Generating embedding for {} ({} chars) with {}",
        profile.owner_id(),
        text.len(),
        client.model()
    );

    let vector = client.embed(&text).await?;

    profile.embedding = Some(Embedding {
        model: client.model().to_string(),
        vector,
        generated_at: chrono::Utc::now(),
    });

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::fixtures::sample_profile;

    #[tokio::test]
    async fn test_augment_sets_embedding_and_version() {
        let mut profile = sample_profile();
        profile.pvs_version = String::new();

        let augmented = augment_profile(profile, &MockEmbeddingClient::new(8)).await.unwrap();

        assert_eq!(augmented.pvs_version, "0.1");
        let embedding = augmented.embedding.unwrap();
        assert_eq!(embedding.model, "mock-embedding");
        assert_eq!(embedding.vector.len(), 8);
    }

    #[tokio::test]
    async fn test_augment_leaves_identity_untouched() {
        let profile = sample_profile();
        let augmented = augment_profile(profile.clone(), &MockEmbeddingClient::new(2))
            .await
            .unwrap();

        assert_eq!(augmented.identity, profile.identity);
        assert_eq!(augmented.communication_style, profile.communication_style);
    }
}
