//! Error types for model finalization and instance generation.

use forge_core::{ConfigError, SchemaError, ValueError};
use forge_generator::RegistryError;
use thiserror::Error;

/// Errors raised while finalizing a model or building instances.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// A slot has no visible structure and nothing was bound to it.
    #[error("Unsupported type '{type_name}' at '{path}': set, generate, supply or ignore it")]
    UnsupportedType { path: String, type_name: String },

    /// Uniqueness could not be satisfied within the retry bound.
    #[error("No unique value for '{path}' after {attempts} attempts")]
    UniquenessExhausted { path: String, attempts: usize },

    /// Assignment rules depend on each other in a cycle.
    #[error("Assignment rules form a cycle: {}", cycle.join(" -> "))]
    CyclicAssignment { cycle: Vec<String> },

    /// Configuration is internally inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Schema introspection failed.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Generated value did not convert into the target type.
    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    /// Model configuration could not be parsed.
    #[error("Failed to parse model configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Value could not be fingerprinted for uniqueness checks.
    #[error("Failed to fingerprint value: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for ForgeError {
    fn from(err: ConfigError) -> Self {
        ForgeError::InvalidConfiguration(err.to_string())
    }
}

impl From<RegistryError> for ForgeError {
    fn from(err: RegistryError) -> Self {
        ForgeError::InvalidConfiguration(err.to_string())
    }
}

impl ForgeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ForgeError::InvalidConfiguration(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ForgeError> = std::result::Result<T, E>;
