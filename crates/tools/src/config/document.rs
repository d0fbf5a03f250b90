//! Raw document shapes and their validation
//!
//! Loading is split in two: serde reads the document into the permissive
//! `Raw*` structs below (shape errors become [`ConfigError::Syntax`]), then
//! `into_settings` checks every value and builds the typed profiles
//! (value errors become [`ConfigError::Validation`] with the field path).

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

use super::compiler::CompilerProfile;
use super::network::{
    AccountSeed, Accounts, ForkingConfig, GeneratedAccounts, NetworkProfile, PrivateKey,
};
use super::wide::{ether, RawWide};
use super::Settings;
use crate::error::{ConfigError, ConfigResult};

/// solc's own default when `runs` is omitted
const DEFAULT_OPTIMIZER_RUNS: i64 = 200;
const DEFAULT_GENERATED_COUNT: i64 = 20;
const DEFAULT_GENERATED_BALANCE_ETHER: u64 = 10_000;

const URL_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

/// Serialization format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(DocumentFormat::Toml),
            Some("json") => Ok(DocumentFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Toml => "TOML",
            DocumentFormat::Json => "JSON",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDocument {
    #[serde(rename = "defaultNetwork", default)]
    default_network: Option<String>,
    compiler: RawCompiler,
    #[serde(default, deserialize_with = "unique_networks")]
    networks: IndexMap<String, RawNetwork>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCompiler {
    version: String,
    #[serde(default)]
    optimizer: RawOptimizer,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptimizer {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_runs")]
    runs: i64,
}

impl Default for RawOptimizer {
    fn default() -> Self {
        RawOptimizer {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

fn default_runs() -> i64 {
    DEFAULT_OPTIMIZER_RUNS
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNetwork {
    #[serde(rename = "chainId", default)]
    chain_id: Option<RawWide>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "gasPrice", default)]
    gas_price: Option<RawWide>,
    #[serde(default)]
    accounts: Option<RawAccounts>,
    #[serde(default)]
    forking: Option<RawForking>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAccounts {
    List(Vec<String>),
    Generated(RawGenerated),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGenerated {
    #[serde(default)]
    count: Option<i64>,
    #[serde(rename = "initialIndex", default)]
    initial_index: Option<i64>,
    #[serde(rename = "accountsBalance", default)]
    accounts_balance: Option<RawWide>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawForking {
    url: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(rename = "blockNumber", default)]
    block_number: Option<i64>,
}

fn enabled_by_default() -> bool {
    true
}

/// Network table deserializer that refuses repeated names.
///
/// TOML parsers already reject duplicate keys, JSON ones keep the last value.
fn unique_networks<'de, D>(deserializer: D) -> Result<IndexMap<String, RawNetwork>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueNetworks;

    impl<'de> Visitor<'de> for UniqueNetworks {
        type Value = IndexMap<String, RawNetwork>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a table of network profiles keyed by name")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut networks = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, network)) = access.next_entry::<String, RawNetwork>()? {
                if networks.contains_key(&name) {
                    return Err(de::Error::custom(format!("duplicate network `{name}`")));
                }
                networks.insert(name, network);
            }
            Ok(networks)
        }
    }

    deserializer.deserialize_map(UniqueNetworks)
}

/// Parse a document without validating its values.
pub(crate) fn parse(text: &str, format: DocumentFormat) -> ConfigResult<RawDocument> {
    let syntax = |message: String| ConfigError::Syntax { format, message };

    match format {
        DocumentFormat::Toml => toml::from_str(text).map_err(|e| syntax(e.to_string())),
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| syntax(e.to_string())),
    }
}

impl RawDocument {
    /// Validate every field and build the immutable settings.
    pub(crate) fn into_settings(self) -> ConfigResult<Settings> {
        let compiler = self.compiler.validate()?;

        let mut networks = IndexMap::with_capacity(self.networks.len());
        for (name, raw) in self.networks {
            let profile = raw.validate(&name)?;
            debug!(network = %name, kind = profile.kind(), "network profile validated");
            networks.insert(name, profile);
        }

        if let Some(ref default) = self.default_network {
            if !networks.contains_key(default) {
                return Err(ConfigError::invalid(
                    "defaultNetwork",
                    format!("names undeclared network `{default}`"),
                ));
            }
        }

        Ok(Settings::from_parts(compiler, networks, self.default_network))
    }
}

impl RawCompiler {
    fn validate(self) -> ConfigResult<CompilerProfile> {
        let runs = self.optimizer.runs;
        if runs < 0 {
            return Err(ConfigError::invalid(
                "compiler.optimizer.runs",
                format!("must not be negative, got {runs}"),
            ));
        }
        let runs = u32::try_from(runs).map_err(|_| {
            ConfigError::invalid(
                "compiler.optimizer.runs",
                format!("must be at most {}, got {runs}", u32::MAX),
            )
        })?;

        if !self.optimizer.enabled && runs != DEFAULT_OPTIMIZER_RUNS as u32 {
            warn!(runs, "optimizer runs are set but the optimizer is disabled; runs will be ignored");
        }

        CompilerProfile::new(self.version, self.optimizer.enabled, runs)
    }
}

impl RawNetwork {
    fn validate(self, name: &str) -> ConfigResult<NetworkProfile> {
        let invalid = |field: &str, reason: String| ConfigError::invalid_network_field(name, field, reason);

        if name.trim().is_empty() {
            return Err(ConfigError::invalid("networks", "network names must not be empty"));
        }

        let chain_id = self
            .chain_id
            .map(parse_chain_id)
            .transpose()
            .map_err(|reason| invalid("chainId", reason))?;

        let url = self
            .url
            .as_deref()
            .map(parse_url)
            .transpose()
            .map_err(|reason| invalid("url", reason))?;

        let gas_price_wei = match self.gas_price {
            Some(RawWide::Text(ref text)) if text.trim().eq_ignore_ascii_case("auto") => {
                debug!(network = %name, "gas price left to the client estimator");
                None
            }
            Some(raw) => Some(raw.to_u256().map_err(|reason| invalid("gasPrice", reason))?),
            None => None,
        };

        let accounts = self
            .accounts
            .map(|raw| raw.validate(name))
            .transpose()?;

        let forking = self
            .forking
            .map(|raw| raw.validate(name))
            .transpose()?;

        if forking.is_some() && url.is_some() {
            warn!(
                network = %name,
                "forking is configured on a network with a remote url; forking only applies to the local simulator"
            );
        }

        Ok(NetworkProfile {
            name: name.to_string(),
            chain_id,
            url,
            gas_price_wei,
            accounts,
            forking,
        })
    }
}

fn parse_chain_id(raw: RawWide) -> Result<u64, String> {
    match raw {
        RawWide::Int(id) if id > 0 => Ok(id.unsigned_abs()),
        RawWide::Unsigned(id) if id > 0 => Ok(id),
        RawWide::Int(id) => Err(format!("must be a positive integer, got {id}")),
        RawWide::Unsigned(id) => Err(format!("must be a positive integer, got {id}")),
        RawWide::Float(id) => Err(format!("must be a positive integer, got floating-point {id}")),
        RawWide::Text(text) => Err(format!("must be a positive integer, got string {text:?}")),
    }
}

impl RawAccounts {
    fn validate(self, network: &str) -> ConfigResult<Accounts> {
        match self {
            RawAccounts::List(entries) => {
                let seeds = entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        if entry.trim().is_empty() {
                            return Ok(AccountSeed::Unset);
                        }
                        entry.parse::<PrivateKey>().map(AccountSeed::Key).map_err(|reason| {
                            ConfigError::invalid_network_field(
                                network,
                                format!("accounts[{index}]"),
                                reason,
                            )
                        })
                    })
                    .collect::<ConfigResult<Vec<_>>>()?;
                Ok(Accounts::Explicit(seeds))
            }
            RawAccounts::Generated(generated) => generated.validate(network).map(Accounts::Generated),
        }
    }
}

impl RawGenerated {
    fn validate(self, network: &str) -> ConfigResult<GeneratedAccounts> {
        let invalid = |field: &str, reason: String| ConfigError::invalid_network_field(network, field, reason);

        let count = self.count.unwrap_or(DEFAULT_GENERATED_COUNT);
        if count <= 0 {
            return Err(invalid("accounts.count", format!("must be a positive integer, got {count}")));
        }
        let count = u32::try_from(count)
            .map_err(|_| invalid("accounts.count", format!("must be at most {}, got {count}", u32::MAX)))?;

        let initial_index = self.initial_index.unwrap_or(0);
        if initial_index < 0 {
            return Err(invalid(
                "accounts.initialIndex",
                format!("must not be negative, got {initial_index}"),
            ));
        }
        let initial_index = u32::try_from(initial_index).map_err(|_| {
            invalid(
                "accounts.initialIndex",
                format!("must be at most {}, got {initial_index}", u32::MAX),
            )
        })?;

        let balance_wei = match self.accounts_balance {
            Some(raw) => raw
                .to_u256()
                .map_err(|reason| invalid("accounts.accountsBalance", reason))?,
            None => ether(DEFAULT_GENERATED_BALANCE_ETHER),
        };

        Ok(GeneratedAccounts {
            count,
            initial_index,
            balance_wei,
        })
    }
}

impl RawForking {
    fn validate(self, network: &str) -> ConfigResult<ForkingConfig> {
        let url = parse_url(&self.url)
            .map_err(|reason| ConfigError::invalid_network_field(network, "forking.url", reason))?;

        let block_number = match self.block_number {
            Some(block) if block < 0 => {
                return Err(ConfigError::invalid_network_field(
                    network,
                    "forking.blockNumber",
                    format!("must not be negative, got {block}"),
                ));
            }
            Some(block) => Some(block.unsigned_abs()),
            None => None,
        };

        Ok(ForkingConfig {
            url,
            enabled: self.enabled,
            block_number,
        })
    }
}

/// Parse an absolute RPC url.
fn parse_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("{raw:?} is not a valid URL: {e}"))?;

    if !URL_SCHEMES.contains(&url.scheme()) {
        return Err(format!(
            "URL must use one of {} schemes, got {}://",
            URL_SCHEMES.join("/"),
            url.scheme()
        ));
    }
    if url.host_str().is_none() {
        return Err(format!("URL {raw:?} has no host"));
    }

    Ok(url)
}
