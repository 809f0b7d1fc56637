//! @ai:module:intent Benchmark question definitions
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkQuestion, QuestionCategory, QuestionSuite
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Category of benchmark question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Technical,
    Personal,
    Advice,
    Creative,
    /// Any category outside the known four; relevance heuristics pass it automatically.
    #[serde(other)]
    Other,
}

impl QuestionCategory {
    /// @ai:intent Convert category to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Technical => "technical",
            QuestionCategory::Personal => "personal",
            QuestionCategory::Advice => "advice",
            QuestionCategory::Creative => "creative",
            QuestionCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A single question asked with and without the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkQuestion {
    pub id: String,
    pub category: QuestionCategory,
    pub prompt: String,
    /// Style tags the personalized answer should exhibit (direct, technical, detailed, practical)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_style: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl BenchmarkQuestion {
    /// @ai:intent Build the user prompt sent to the model
    /// @ai:effects pure
    pub fn user_prompt(&self) -> String {
        match self.context.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(context) => format!("Context: {}\n\n{}", context.trim(), self.prompt),
            None => self.prompt.clone(),
        }
    }
}

/// @ai:intent A named collection of questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSuite {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<BenchmarkQuestion>,
    /// Profile the suite was authored against, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvs_path: Option<PathBuf>,
}

impl QuestionSuite {
    /// @ai:intent Find a question by id
    /// @ai:effects pure
    pub fn question(&self, id: &str) -> Option<&BenchmarkQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }
}
