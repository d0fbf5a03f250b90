//! chainkit tools library
//!
//! Loads and validates the toolchain configuration document (compiler pin and
//! network profiles) and resolves account keys at runtime.

pub mod config;
pub mod error;
pub mod logging;
pub mod secrets;

pub use config::{CompilerProfile, DocumentFormat, NetworkProfile, Settings};
pub use error::{ConfigError, ConfigResult};
pub use secrets::{resolve_account_keys, EnvSecretSource, MapSecretSource, SecretSource};

/// Re-export of the wide integer type used for wei amounts
pub use alloy_primitives::U256;
