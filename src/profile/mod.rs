//! @ai:module:intent Personal-context profile model, rendering and persistence
//! @ai:module:layer domain
//! @ai:module:public_api Profile, PromptSections, build_system_prompt, ProfileLoader, augment_profile

pub mod embedding;
pub mod loader;
pub mod prompt;
pub mod types;

pub use embedding::{augment_profile, EmbeddingClient, MockEmbeddingClient, OpenAiEmbeddingClient};
pub use loader::ProfileLoader;
pub use prompt::{build_system_prompt, PromptSections};
pub use types::{CommunicationStyle, Embedding, Identity, Owner, Profile, Tone};
