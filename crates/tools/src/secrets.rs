//! Runtime resolution of account keys
//!
//! Account entries left empty in the document are placeholders: the key is
//! supplied at runtime by a [`SecretSource`], never stored in the document
//! and never read while loading it.
//!
//! The environment source looks up, in order:
//!
//! 1. `CHAINKIT_<NETWORK>_PRIVATE_KEY_<index>`
//! 2. `CHAINKIT_<NETWORK>_PRIVATE_KEY` (account 0 only)
//!
//! where `<NETWORK>` is the network name upper-cased with `-` and `.`
//! mapped to `_`.

use std::collections::HashMap;
use tracing::debug;

use crate::config::{AccountSeed, NetworkProfile, PrivateKey};
use crate::error::{ConfigError, ConfigResult};

/// Prefix of every environment variable the toolchain reads
pub const ENV_PREFIX: &str = "CHAINKIT_";

/// Supplier of private keys for unset account entries
pub trait SecretSource {
    /// Raw key for account `index` of `network`, `None` if the source has none.
    fn private_key(&self, network: &str, index: usize) -> ConfigResult<Option<String>>;
}

/// Keys from process environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretSource;

impl EnvSecretSource {
    pub fn new() -> Self {
        EnvSecretSource
    }

    /// Load a `.env` file from the working directory first, if present.
    pub fn with_dotenv() -> Self {
        // Missing .env is not an error
        match dotenvy::dotenv() {
            Ok(path) => debug!("loaded environment from {:?}", path),
            Err(e) => debug!("no .env loaded: {}", e),
        }
        Self::new()
    }

    /// Variable names tried for one account, most specific first.
    pub fn variable_names(network: &str, index: usize) -> Vec<String> {
        let stem = format!("{}{}_PRIVATE_KEY", ENV_PREFIX, env_segment(network));
        let mut names = vec![format!("{stem}_{index}")];
        if index == 0 {
            names.push(stem);
        }
        names
    }
}

impl SecretSource for EnvSecretSource {
    fn private_key(&self, network: &str, index: usize) -> ConfigResult<Option<String>> {
        for name in Self::variable_names(network, index) {
            match std::env::var(&name) {
                Ok(value) if !value.trim().is_empty() => {
                    debug!(network, index, variable = %name, "account key taken from environment");
                    return Ok(Some(value));
                }
                Ok(_) | Err(std::env::VarError::NotPresent) => continue,
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(ConfigError::invalid_network_field(
                        network,
                        format!("accounts[{index}]"),
                        format!("environment variable {name} is not valid unicode"),
                    ));
                }
            }
        }
        Ok(None)
    }
}

/// In-memory keys, keyed by network name and account index
#[derive(Debug, Clone, Default)]
pub struct MapSecretSource {
    keys: HashMap<(String, usize), String>,
}

impl MapSecretSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, network: impl Into<String>, index: usize, key: impl Into<String>) {
        self.keys.insert((network.into(), index), key.into());
    }

    pub fn with_key(mut self, network: impl Into<String>, index: usize, key: impl Into<String>) -> Self {
        self.insert(network, index, key);
        self
    }
}

impl SecretSource for MapSecretSource {
    fn private_key(&self, network: &str, index: usize) -> ConfigResult<Option<String>> {
        Ok(self.keys.get(&(network.to_string(), index)).cloned())
    }
}

/// Signing keys of a network, unset entries filled from `source`.
///
/// Networks with generated accounts (or none) resolve to an empty list.
///
/// # Errors
///
/// - [`ConfigError::MissingSecret`] if the source has no key for an unset entry
/// - [`ConfigError::Validation`] if the supplied key is not a 32-byte hex key
pub fn resolve_account_keys(
    profile: &NetworkProfile,
    source: &dyn SecretSource,
) -> ConfigResult<Vec<PrivateKey>> {
    profile
        .account_seeds()
        .iter()
        .enumerate()
        .map(|(index, seed)| match seed {
            AccountSeed::Key(key) => Ok(key.clone()),
            AccountSeed::Unset => {
                let raw = source
                    .private_key(&profile.name, index)?
                    .ok_or_else(|| ConfigError::MissingSecret {
                        network: profile.name.clone(),
                        index,
                    })?;
                raw.parse::<PrivateKey>().map_err(|reason| {
                    ConfigError::invalid_network_field(
                        &profile.name,
                        format!("accounts[{index}]"),
                        format!("secret {reason}"),
                    )
                })
            }
        })
        .collect()
}

fn env_segment(network: &str) -> String {
    network
        .chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Accounts, GeneratedAccounts};
    use alloy_primitives::U256;

    const KEY_A: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const KEY_B: &str = "0x8da4ef21b864d2cc526dbdb2a120bd2874c36c9d0a1fb7f8c63d7f7a8b41de8f";

    fn profile(name: &str, seeds: Vec<AccountSeed>) -> NetworkProfile {
        NetworkProfile {
            name: name.to_string(),
            chain_id: Some(943),
            url: None,
            gas_price_wei: None,
            accounts: Some(Accounts::Explicit(seeds)),
            forking: None,
        }
    }

    #[test]
    fn test_variable_names() {
        assert_eq!(
            EnvSecretSource::variable_names("testnet", 0),
            vec!["CHAINKIT_TESTNET_PRIVATE_KEY_0", "CHAINKIT_TESTNET_PRIVATE_KEY"]
        );
        assert_eq!(
            EnvSecretSource::variable_names("pulse-v4", 2),
            vec!["CHAINKIT_PULSE_V4_PRIVATE_KEY_2"]
        );
    }

    #[test]
    fn test_unset_seeds_come_from_source() {
        let profile = profile(
            "testnet",
            vec![AccountSeed::Unset, AccountSeed::Key(KEY_B.parse().unwrap())],
        );
        let source = MapSecretSource::new().with_key("testnet", 0, KEY_A);

        let keys = resolve_account_keys(&profile, &source).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].to_hex(), KEY_A);
        assert_eq!(keys[1].to_hex(), KEY_B);
    }

    #[test]
    fn test_missing_secret() {
        let profile = profile("pulse", vec![AccountSeed::Unset]);
        let err = resolve_account_keys(&profile, &MapSecretSource::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSecret { ref network, index: 0 } if network == "pulse"
        ));
    }

    #[test]
    fn test_malformed_secret() {
        let profile = profile("pulse", vec![AccountSeed::Unset]);
        let source = MapSecretSource::new().with_key("pulse", 0, "0x1234");
        let err = resolve_account_keys(&profile, &source).unwrap_err();
        assert_eq!(err.field(), Some("accounts[0]"));
    }

    #[test]
    fn test_generated_accounts_need_no_keys() {
        let mut profile = profile("hardhat", Vec::new());
        profile.accounts = Some(Accounts::Generated(GeneratedAccounts {
            count: 10,
            initial_index: 0,
            balance_wei: U256::from(1u64),
        }));
        let keys = resolve_account_keys(&profile, &MapSecretSource::new()).unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_env_source_reads_indexed_then_plain() {
        // Unique network name keeps this test independent of the others.
        std::env::set_var("CHAINKIT_ENVTEST_NET_PRIVATE_KEY", KEY_A);
        std::env::set_var("CHAINKIT_ENVTEST_NET_PRIVATE_KEY_1", KEY_B);

        let source = EnvSecretSource::new();
        assert_eq!(
            source.private_key("envtest-net", 0).unwrap().as_deref(),
            Some(KEY_A)
        );
        assert_eq!(
            source.private_key("envtest-net", 1).unwrap().as_deref(),
            Some(KEY_B)
        );
        assert_eq!(source.private_key("envtest-net", 2).unwrap(), None);

        std::env::remove_var("CHAINKIT_ENVTEST_NET_PRIVATE_KEY");
        std::env::remove_var("CHAINKIT_ENVTEST_NET_PRIVATE_KEY_1");
    }
}
