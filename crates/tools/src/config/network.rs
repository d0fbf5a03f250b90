//! Network profiles
//!
//! A profile either points at a remote chain (url, chain id, gas price and
//! signing keys) or describes the local simulated chain (generated, pre-funded
//! accounts and optional forking of a live network).

use alloy_primitives::{hex, B256, U256};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::wide::{serialize_opt_u256, serialize_u256};

const REDACTED: &str = "<redacted>";

/// Validated profile for one named network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    /// Key of the profile in the document
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "chainId", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    #[serde(
        rename = "gasPrice",
        serialize_with = "serialize_opt_u256",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas_price_wei: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Accounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forking: Option<ForkingConfig>,
}

/// Where a network's accounts come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Accounts {
    /// Literal keys, in signing order
    Explicit(Vec<AccountSeed>),
    /// Deterministically generated, pre-funded accounts for the simulator
    Generated(GeneratedAccounts),
}

/// One entry of an explicit account list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSeed {
    /// Left empty in the document; filled at runtime from a secret source
    Unset,
    Key(PrivateKey),
}

/// Generated-account descriptor of the local simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedAccounts {
    pub count: u32,
    #[serde(rename = "initialIndex")]
    pub initial_index: u32,
    #[serde(rename = "accountsBalance", serialize_with = "serialize_u256")]
    pub balance_wei: U256,
}

/// Fork a live network into the local simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForkingConfig {
    pub url: Url,
    pub enabled: bool,
    /// Pin the fork to this block instead of the chain head
    #[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Connection parameters handed to the network client factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint<'a> {
    pub url: &'a Url,
    pub chain_id: Option<u64>,
    pub gas_price_wei: Option<U256>,
}

impl NetworkProfile {
    /// Keys listed in the document, empty for generated accounts.
    pub fn account_seeds(&self) -> &[AccountSeed] {
        match &self.accounts {
            Some(Accounts::Explicit(seeds)) => seeds,
            _ => &[],
        }
    }

    /// Simulator account descriptor, if this network generates its accounts.
    pub fn simulation(&self) -> Option<&GeneratedAccounts> {
        match &self.accounts {
            Some(Accounts::Generated(generated)) => Some(generated),
            _ => None,
        }
    }

    /// Remote endpoint, `None` for the in-process simulator.
    pub fn endpoint(&self) -> Option<RpcEndpoint<'_>> {
        self.url.as_ref().map(|url| RpcEndpoint {
            url,
            chain_id: self.chain_id,
            gas_price_wei: self.gas_price_wei,
        })
    }

    /// A network without a remote url runs inside the local simulator.
    pub fn is_simulated(&self) -> bool {
        self.url.is_none()
    }

    /// Fork source when forking is configured and switched on.
    pub fn active_fork(&self) -> Option<&ForkingConfig> {
        self.forking.as_ref().filter(|fork| fork.enabled)
    }

    /// Number of explicit account entries still waiting for a secret.
    pub fn unset_seed_count(&self) -> usize {
        self.account_seeds()
            .iter()
            .filter(|seed| matches!(seed, AccountSeed::Unset))
            .count()
    }

    /// Profile as JSON for display, literal account keys replaced by `<redacted>`.
    ///
    /// Use [`Settings::to_json_string`](super::Settings::to_json_string) when the
    /// keys themselves are needed.
    pub fn to_display_json(&self) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(Value::Array(entries)) = value.get_mut("accounts") {
            for (entry, seed) in entries.iter_mut().zip(self.account_seeds()) {
                if let AccountSeed::Key(_) = seed {
                    *entry = Value::String(REDACTED.to_string());
                }
            }
        }
        if let Value::Object(fields) = &mut value {
            fields.insert("name".to_string(), Value::String(self.name.clone()));
        }
        Ok(value)
    }

    /// Short human-readable kind used in listings.
    pub fn kind(&self) -> &'static str {
        match (self.is_simulated(), self.active_fork().is_some()) {
            (true, true) => "simulated (forked)",
            (true, false) => "simulated",
            (false, _) => "remote",
        }
    }
}

impl Serialize for AccountSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AccountSeed::Unset => serializer.serialize_str(""),
            AccountSeed::Key(key) => serializer.serialize_str(&key.to_hex()),
        }
    }
}

/// A 32-byte secp256k1 private key
///
/// Never printed: `Debug` and `Display` are redacted. Use [`PrivateKey::to_hex`]
/// when the raw key has to be handed to a signer.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(B256);

impl PrivateKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }

    /// `0x`-prefixed lowercase hex of the key.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(self.0)
    }
}

impl FromStr for PrivateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 64 {
            return Err(format!(
                "private key must be 32 bytes of hex (64 digits), got {} digits",
                digits.len()
            ));
        }
        let bytes = B256::from_str(digits)
            .map_err(|_| "private key contains non-hex characters".to_string())?;
        if bytes == B256::ZERO {
            return Err("private key must not be zero".to_string());
        }
        Ok(PrivateKey(bytes))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({REDACTED})")
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn remote(url: &str) -> NetworkProfile {
        NetworkProfile {
            name: "testnet".to_string(),
            chain_id: Some(943),
            url: Some(Url::parse(url).unwrap()),
            gas_price_wei: Some(U256::from(50_000_000_000u64)),
            accounts: Some(Accounts::Explicit(vec![AccountSeed::Unset])),
            forking: None,
        }
    }

    #[test]
    fn test_private_key_parsing() {
        let key: PrivateKey = KEY.parse().unwrap();
        assert_eq!(key.to_hex(), KEY);

        let unprefixed: PrivateKey = KEY.trim_start_matches("0x").parse().unwrap();
        assert_eq!(unprefixed, key);

        let upper_prefix: PrivateKey = KEY.replacen("0x", "0X", 1).parse().unwrap();
        assert_eq!(upper_prefix, key);
    }

    #[test]
    fn test_private_key_rejections() {
        assert!("0x1234".parse::<PrivateKey>().is_err());
        assert!(format!("0x{}", "zz".repeat(32)).parse::<PrivateKey>().is_err());
        assert!(format!("0x{}", "00".repeat(32)).parse::<PrivateKey>().is_err());
    }

    #[test]
    fn test_private_key_is_redacted() {
        let key: PrivateKey = KEY.parse().unwrap();
        assert_eq!(format!("{key:?}"), "PrivateKey(<redacted>)");
        assert_eq!(key.to_string(), "<redacted>");
        let seed = AccountSeed::Key(key);
        assert!(!format!("{seed:?}").contains("4c0883"));
    }

    #[test]
    fn test_display_json_hides_keys() {
        let mut profile = remote("https://rpc.pulsechain.com");
        profile.accounts = Some(Accounts::Explicit(vec![
            AccountSeed::Key(KEY.parse().unwrap()),
            AccountSeed::Unset,
        ]));

        let value = profile.to_display_json().unwrap();
        assert_eq!(value["name"], "testnet");
        assert_eq!(value["chainId"], 943);
        assert_eq!(value["accounts"], serde_json::json!(["<redacted>", ""]));
        assert!(!value.to_string().contains("4c0883"));
    }

    #[test]
    fn test_remote_endpoint() {
        let profile = remote("https://rpc.v4.testnet.pulsechain.com");
        let endpoint = profile.endpoint().unwrap();
        assert_eq!(endpoint.url.host_str(), Some("rpc.v4.testnet.pulsechain.com"));
        assert_eq!(endpoint.chain_id, Some(943));
        assert_eq!(endpoint.gas_price_wei, Some(U256::from(50_000_000_000u64)));
        assert!(!profile.is_simulated());
        assert_eq!(profile.kind(), "remote");
        assert_eq!(profile.unset_seed_count(), 1);
        assert!(profile.simulation().is_none());
    }

    #[test]
    fn test_simulated_profile() {
        let profile = NetworkProfile {
            name: "hardhat".to_string(),
            chain_id: None,
            url: None,
            gas_price_wei: None,
            accounts: Some(Accounts::Generated(GeneratedAccounts {
                count: 10,
                initial_index: 0,
                balance_wei: U256::from(1u64),
            })),
            forking: Some(ForkingConfig {
                url: Url::parse("https://rpc.pulsechain.com").unwrap(),
                enabled: true,
                block_number: None,
            }),
        };
        assert!(profile.endpoint().is_none());
        assert!(profile.is_simulated());
        assert!(profile.account_seeds().is_empty());
        assert_eq!(profile.simulation().map(|s| s.count), Some(10));
        assert_eq!(profile.kind(), "simulated (forked)");
    }

    #[test]
    fn test_disabled_fork_is_inactive() {
        let mut profile = remote("https://rpc.pulsechain.com");
        profile.url = None;
        profile.forking = Some(ForkingConfig {
            url: Url::parse("https://rpc.pulsechain.com").unwrap(),
            enabled: false,
            block_number: Some(17_000_000),
        });
        assert!(profile.active_fork().is_none());
        assert_eq!(profile.kind(), "simulated");
    }
}
