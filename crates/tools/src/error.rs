//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

use crate::config::DocumentFormat;

/// Errors raised while loading, validating or querying the toolchain configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension does not map to a known document format
    #[error("Unsupported config file format: {0}. Expected a .toml or .json file")]
    UnsupportedFormat(PathBuf),

    /// The document is not well-formed or does not have the expected shape
    #[error("{format} syntax error: {message}")]
    Syntax {
        format: DocumentFormat,
        message: String,
    },

    /// The document is well-formed but a field holds an invalid value
    #[error("{}", describe_validation(.network.as_deref(), .field, .reason))]
    Validation {
        network: Option<String>,
        field: String,
        reason: String,
    },

    /// A network was requested by a name the document does not declare
    #[error("Unknown network: {name}. Available networks: {}", .available.join(", "))]
    UnknownNetwork {
        name: String,
        available: Vec<String>,
    },

    /// Settings could not be written back to a document
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    /// An unset account seed has no value in the secret source
    #[error("No private key available for account {index} of network {network}")]
    MissingSecret { network: String, index: usize },
}

impl ConfigError {
    /// Validation error on a top-level (non-network) field.
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Validation {
            network: None,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Validation error on a field of the named network.
    pub(crate) fn invalid_network_field(
        network: &str,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::Validation {
            network: Some(network.to_string()),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Field path of a validation error, e.g. `url` or `accounts.count`.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Network a validation error refers to, if any.
    pub fn network(&self) -> Option<&str> {
        match self {
            ConfigError::Validation { network, .. } => network.as_deref(),
            ConfigError::UnknownNetwork { name, .. } => Some(name),
            ConfigError::MissingSecret { network, .. } => Some(network),
            _ => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ConfigError::Syntax { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ConfigError::Validation { .. })
    }
}

fn describe_validation(network: Option<&str>, field: &str, reason: &str) -> String {
    match network {
        Some(network) => format!("Invalid field `networks.{network}.{field}`: {reason}"),
        None => format!("Invalid field `{field}`: {reason}"),
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
