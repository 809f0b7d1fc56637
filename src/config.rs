//! @ai:module:intent Configuration structs for the PVS benchmark system
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, ApiConfig, JudgeConfig, RunConfig, FilterConfig, WeightsConfig, ImprovementWeights, ModelConfig
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::runner::client::Provider;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// @ai:intent Main configuration for the benchmark system
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub judge: JudgeConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

/// @ai:intent Request settings shared by every provider adapter
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// @ai:intent Settings for the AI judge used by the evaluator
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_judge_provider")]
    pub provider: String,
    #[serde(default = "default_judge_model")]
    pub model: String,
}

/// @ai:intent Run configuration for benchmark execution
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub dry_run: bool,
    /// Extra instructions appended to the injected system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addendum: Option<String>,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// @ai:intent Filter configuration for selecting questions
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub categories: Option<Vec<String>>,
    pub question_ids: Option<Vec<String>>,
}

/// @ai:intent Weights for the improvement metric and the evaluator blend
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_time_weight")]
    pub time: f64,
    #[serde(default = "default_token_weight")]
    pub token: f64,
    #[serde(default = "default_length_weight")]
    pub length: f64,
    #[serde(default = "default_algorithmic_weight")]
    pub algorithmic: f64,
    #[serde(default = "default_ai_weight")]
    pub ai: f64,
}

/// @ai:intent Blend of time, token and length ratios in the improvement metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImprovementWeights {
    pub time: f64,
    pub token: f64,
    pub length: f64,
}

/// @ai:intent Path configuration for inputs and outputs
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_profile_path")]
    pub profile: PathBuf,
    #[serde(default = "default_questions_path")]
    pub questions: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

/// @ai:intent One provider/model pair to benchmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            judge: JudgeConfig::default(),
            run: RunConfig::default(),
            weights: WeightsConfig::default(),
            paths: PathConfig::default(),
            models: default_models(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            requests_per_minute: default_rate_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: default_judge_provider(),
            model: default_judge_model(),
        }
    }
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            time: default_time_weight(),
            token: default_token_weight(),
            length: default_length_weight(),
            algorithmic: default_algorithmic_weight(),
            ai: default_ai_weight(),
        }
    }
}

impl Default for ImprovementWeights {
    fn default() -> Self {
        Self {
            time: default_time_weight(),
            token: default_token_weight(),
            length: default_length_weight(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            profile: default_profile_path(),
            questions: default_questions_path(),
            results_dir: default_results_dir(),
        }
    }
}

fn default_models() -> Vec<ModelConfig> {
    vec![ModelConfig {
        provider: "openai".to_string(),
        model: "gpt-4o-mini".to_string(),
    }]
}

fn default_profile_path() -> PathBuf {
    PathBuf::from("pvs.json")
}

fn default_questions_path() -> PathBuf {
    PathBuf::from("questions.json")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_rate_limit() -> u32 {
    60
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_judge_provider() -> String {
    "openai".to_string()
}

fn default_judge_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_algorithmic_weight() -> f64 {
    0.4
}

fn default_ai_weight() -> f64 {
    0.6
}

fn default_time_weight() -> f64 {
    0.5
}

fn default_token_weight() -> f64 {
    0.35
}

fn default_length_weight() -> f64 {
    0.15
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Validate every configured model and the judge before any network call
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        for model in &self.models {
            model.provider()?;
        }

        if self.judge.enabled {
            Provider::from_str(&self.judge.provider)?;
        }

        self.weights.improvement().validate()
    }
}

impl WeightsConfig {
    /// @ai:intent Improvement-metric weights as a value type
    /// @ai:effects pure
    pub fn improvement(&self) -> ImprovementWeights {
        ImprovementWeights {
            time: self.time,
            token: self.token,
            length: self.length,
        }
    }

    /// @ai:intent Override improvement-metric weights (e.g. from --weights)
    /// @ai:effects state:write
    pub fn set_improvement(&mut self, weights: ImprovementWeights) {
        self.time = weights.time;
        self.token = weights.token;
        self.length = weights.length;
    }
}

impl FilterConfig {
    /// @ai:intent Check if filter matches a question
    /// @ai:effects pure
    pub fn matches(&self, category: &str, id: &str) -> bool {
        let category_match = self
            .categories
            .as_ref()
            .map(|c| c.iter().any(|cat| cat == category))
            .unwrap_or(true);

        let id_match = self
            .question_ids
            .as_ref()
            .map(|ids| ids.iter().any(|question_id| question_id == id))
            .unwrap_or(true);

        category_match && id_match
    }
}

impl ImprovementWeights {
    fn validate(&self) -> Result<()> {
        let valid = [self.time, self.token, self.length]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);

        if valid {
            Ok(())
        } else {
            Err(Error::MalformedWeights(format!(
                "{},{},{}",
                self.time, self.token, self.length
            )))
        }
    }
}

impl FromStr for ImprovementWeights {
    type Err = Error;

    /// @ai:intent Parse "time,token,length" weights from the command line
    /// @ai:example ("0.5,0.35,0.15") -> ImprovementWeights { time: 0.5, token: 0.35, length: 0.15 }
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| Error::MalformedWeights(s.to_string()))?;

        let [time, token, length] = parts[..] else {
            return Err(Error::MalformedWeights(s.to_string()));
        };

        let weights = Self { time, token, length };
        weights
            .validate()
            .map_err(|_| Error::MalformedWeights(s.to_string()))?;
        Ok(weights)
    }
}

impl ModelConfig {
    /// @ai:intent Parse a "provider:model" command-line spec
    /// @ai:effects pure
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let (provider, model) = spec
            .split_once(':')
            .map(|(p, m)| (p.trim(), m.trim()))
            .filter(|(p, m)| !p.is_empty() && !m.is_empty())
            .ok_or_else(|| Error::MalformedModelSpec(spec.to_string()))?;

        let config = Self {
            provider: provider.to_lowercase(),
            model: model.to_string(),
        };
        config.provider()?;
        Ok(config)
    }

    /// @ai:intent Resolve the provider name against the registry
    /// @ai:effects pure
    pub fn provider(&self) -> Result<Provider> {
        Provider::from_str(&self.provider)
    }
}
