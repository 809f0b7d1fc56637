//! @ai:module:intent Define error types for the PVS benchmark system
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for PVS configuration, loading and evaluation
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown provider '{0}' (expected one of: openai, anthropic, gemini, mistral, deepseek, mock)")]
    UnknownProvider(String),

    #[error("Malformed weight string '{0}': expected three comma-separated non-negative numbers (time,token,length)")]
    MalformedWeights(String),

    #[error("Malformed model spec '{0}': expected <provider>:<model>")]
    MalformedModelSpec(String),

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(&'static str),

    #[error("Unsupported question suite format: {0}")]
    UnsupportedSuiteFormat(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
