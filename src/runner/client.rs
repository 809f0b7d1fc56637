//! @ai:module:intent Provider registry and the adapter contract used by the runner
//! @ai:module:layer infrastructure
//! @ai:module:public_api Provider, ProviderAdapter, Adapter, create_adapter, MockAdapter, MockReply
//! @ai:module:stateless false

use crate::config::{ApiConfig, ModelConfig};
use crate::error::{Error, Result};
use crate::profile::{build_system_prompt, Profile};
use crate::runner::anthropic::AnthropicAdapter;
use crate::runner::gemini::GeminiAdapter;
use crate::runner::openai::OpenAiAdapter;
use crate::runner::rate_limiter::RateLimiter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// @ai:intent Known LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
    Mistral,
    DeepSeek,
    Mock,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::Mistral,
        Provider::DeepSeek,
        Provider::Mock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Mistral => "mistral",
            Provider::DeepSeek => "deepseek",
            Provider::Mock => "mock",
        }
    }

    pub fn api_base(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Provider::Mistral => "https://api.mistral.ai/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
            Provider::Mock => "",
        }
    }

    /// Environment variable holding the API key; `None` for the offline mock
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::Mistral => Some("MISTRAL_API_KEY"),
            Provider::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Provider::Mock => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-haiku-latest",
            Provider::Gemini => "gemini-1.5-flash",
            Provider::Mistral => "mistral-large-latest",
            Provider::DeepSeek => "deepseek-chat",
            Provider::Mock => "mock",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownProvider(s.to_string()))
    }
}

/// @ai:intent Contract every provider adapter fulfils: render context, answer a query
#[allow(async_fn_in_trait)]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    fn model(&self) -> &str;

    /// @ai:intent Render the profile into the system text sent with enhanced queries
    /// @ai:post the embedding vector never appears in the output
    /// @ai:effects pure
    fn inject(&self, profile: &Profile, addendum: Option<&str>) -> String {
        build_system_prompt(profile, addendum)
    }

    /// @ai:intent Wait until the provider may be called; excluded from measured latency
    /// @ai:effects time
    async fn ready(&self) {}

    /// @ai:intent Send one user prompt, with optional system text, and return the reply
    async fn query(&self, user_prompt: &str, system: Option<&str>) -> anyhow::Result<String>;
}

/// @ai:intent Connection settings shared by the HTTP adapters
pub struct HttpContext {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) max_tokens: u32,
    pub(crate) temperature: f32,
    pub(crate) rate_limiter: Arc<RateLimiter>,
}

impl HttpContext {
    /// @ai:intent Build an HTTP context for a provider, reading its key from the environment
    /// @ai:pre the provider's API-key environment variable is set
    /// @ai:effects env
    pub fn from_env(provider: Provider, api: &ApiConfig) -> Result<Self> {
        let api_key = match provider.env_var() {
            Some(var) => std::env::var(var).map_err(|_| Error::MissingApiKey(var))?,
            None => String::new(),
        };

        Self::with_key(api_key, api)
    }

    /// @ai:intent Build an HTTP context with an explicit key
    /// @ai:effects pure
    pub fn with_key(api_key: String, api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            max_tokens: api.max_tokens,
            temperature: api.temperature,
            rate_limiter: Arc::new(RateLimiter::new(api.requests_per_minute)),
        })
    }
}

/// @ai:intent Tagged variant over every concrete adapter
pub enum Adapter {
    Anthropic(AnthropicAdapter),
    OpenAiCompatible(OpenAiAdapter),
    Gemini(GeminiAdapter),
    Mock(MockAdapter),
}

impl ProviderAdapter for Adapter {
    fn provider(&self) -> Provider {
        match self {
            Adapter::Anthropic(a) => a.provider(),
            Adapter::OpenAiCompatible(a) => a.provider(),
            Adapter::Gemini(a) => a.provider(),
            Adapter::Mock(a) => a.provider(),
        }
    }

    fn model(&self) -> &str {
        match self {
            Adapter::Anthropic(a) => a.model(),
            Adapter::OpenAiCompatible(a) => a.model(),
            Adapter::Gemini(a) => a.model(),
            Adapter::Mock(a) => a.model(),
        }
    }

    async fn ready(&self) {
        match self {
            Adapter::Anthropic(a) => a.ready().await,
            Adapter::OpenAiCompatible(a) => a.ready().await,
            Adapter::Gemini(a) => a.ready().await,
            Adapter::Mock(a) => a.ready().await,
        }
    }

    async fn query(&self, user_prompt: &str, system: Option<&str>) -> anyhow::Result<String> {
        match self {
            Adapter::Anthropic(a) => a.query(user_prompt, system).await,
            Adapter::OpenAiCompatible(a) => a.query(user_prompt, system).await,
            Adapter::Gemini(a) => a.query(user_prompt, system).await,
            Adapter::Mock(a) => a.query(user_prompt, system).await,
        }
    }
}

/// @ai:intent Build the adapter for a configured provider/model pair
/// @ai:pre provider name is registered and its API key is available
/// @ai:effects env
pub fn create_adapter(model: &ModelConfig, api: &ApiConfig) -> Result<Adapter> {
    let provider = model.provider()?;
    let name = model.model.clone();

    let adapter = match provider {
        Provider::Mock => Adapter::Mock(MockAdapter::new(name)),
        Provider::Anthropic => {
            Adapter::Anthropic(AnthropicAdapter::new(name, HttpContext::from_env(provider, api)?))
        }
        Provider::Gemini => {
            Adapter::Gemini(GeminiAdapter::new(name, HttpContext::from_env(provider, api)?))
        }
        Provider::OpenAi | Provider::Mistral | Provider::DeepSeek => Adapter::OpenAiCompatible(
            OpenAiAdapter::new(provider, name, HttpContext::from_env(provider, api)?),
        ),
    };

    tracing::debug!("Created adapter {}/{}", adapter.provider(), adapter.model());
    Ok(adapter)
}

/// @ai:intent Scripted outcome of a mock query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Failure(String),
}

const DRY_RUN_BASELINE: &str = "Here is a general answer. It covers the common approach and \
lists the usual trade-offs without assuming anything about who is asking.";

const DRY_RUN_ENHANCED: &str = "Given your background, the short version: pick the approach \
that fits your stack, implement it with a small example, and verify the result with a test.";

/// @ai:intent Offline adapter for tests and dry runs
/// @ai:invariant baseline queries (no system text) get the baseline reply, others the enhanced one
pub struct MockAdapter {
    model: String,
    baseline: MockReply,
    enhanced: MockReply,
    pacing: Duration,
    calls: AtomicUsize,
    systems: Mutex<Vec<Option<String>>>,
}

impl MockAdapter {
    /// @ai:intent Create a mock returning canned dry-run answers
    /// @ai:effects pure
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            baseline: MockReply::Text(DRY_RUN_BASELINE.to_string()),
            enhanced: MockReply::Text(DRY_RUN_ENHANCED.to_string()),
            pacing: Duration::ZERO,
            calls: AtomicUsize::new(0),
            systems: Mutex::new(Vec::new()),
        }
    }

    pub fn with_baseline(mut self, reply: MockReply) -> Self {
        self.baseline = reply;
        self
    }

    pub fn with_enhanced(mut self, reply: MockReply) -> Self {
        self.enhanced = reply;
        self
    }

    /// Simulated rate-limit wait before each query
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Number of queries received so far
    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// System texts received, in call order
    pub fn received_systems(&self) -> Vec<Option<String>> {
        self.systems
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl ProviderAdapter for MockAdapter {
    fn provider(&self) -> Provider {
        Provider::Mock
    }

    fn model(&self) -> &str {
        &self.model
    }

    /// @ai:effects time
    async fn ready(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }

    /// @ai:intent Return the scripted reply for this kind of query
    /// @ai:effects state:write
    async fn query(&self, _user_prompt: &str, system: Option<&str>) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut systems) = self.systems.lock() {
            systems.push(system.map(str::to_string));
        }

        let reply = if system.is_some() {
            &self.enhanced
        } else {
            &self.baseline
        };

        match reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Failure(message) => anyhow::bail!("{}", message),
        }
    }
}
