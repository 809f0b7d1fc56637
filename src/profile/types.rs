//! @ai:module:intent Personal-context (PVS) profile definitions
//! @ai:module:layer domain
//! @ai:module:public_api Profile, Owner, Identity, CommunicationStyle, Tone, Embedding
//! @ai:module:stateless true

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PVS_VERSION: &str = "0.1";

/// @ai:intent Preferred tone of voice for responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Direct,
    Friendly,
    Formal,
    Casual,
    Technical,
}

impl Tone {
    /// @ai:intent Convert tone to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Direct => "direct",
            Tone::Friendly => "friendly",
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Technical => "technical",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Who the profile belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// @ai:intent Background, skills and interests of the owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise_areas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
}

/// @ai:intent How the owner wants to be spoken to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationStyle {
    pub tone: Tone,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Free-text preferences keyed by topic; `answers`, `code` and `explanations` are rendered.
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
}

impl CommunicationStyle {
    /// @ai:intent Look up a preference, falling back to a placeholder when unset
    /// @ai:effects pure
    pub fn preference(&self, key: &str) -> &str {
        self.preferences
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("no preference")
    }
}

/// @ai:intent Vector embedding of the profile, kept out of every LLM request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub model: String,
    pub vector: Vec<f32>,
    pub generated_at: DateTime<Utc>,
}

/// @ai:intent The portable personal-context record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_pvs_version")]
    pub pvs_version: String,
    pub owner: Owner,
    pub identity: Identity,
    pub communication_style: CommunicationStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Embedding>,
}

fn default_pvs_version() -> String {
    DEFAULT_PVS_VERSION.to_string()
}

impl Profile {
    /// @ai:intent Stable identifier of the owner used in reports
    /// @ai:effects pure
    pub fn owner_id(&self) -> &str {
        &self.owner.name
    }

    /// @ai:intent Text that represents the profile for embedding generation
    /// @ai:effects pure
    pub fn embedding_text(&self) -> String {
        let mut parts = vec![self.identity.bio.clone()];
        parts.push(self.identity.skills.join(", "));
        parts.push(self.identity.interests.join(", "));

        if let Some(ref areas) = self.identity.expertise_areas {
            parts.push(areas.join(", "));
        }

        parts.retain(|p| !p.is_empty());
        parts.join("\n")
    }
}
