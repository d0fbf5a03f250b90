//! Toolchain configuration
//!
//! One declarative document pins the compiler and declares the networks the
//! toolchain can talk to. It is loaded once, validated in full and handed to
//! consumers as an immutable [`Settings`] value.
//!
//! Documents are TOML or JSON:
//!
//! ```toml
//! [compiler]
//! version = "0.8.19"
//! optimizer = { enabled = true, runs = 1000 }
//!
//! [networks.pulse]
//! chainId = 369
//! url = "https://rpc.pulsechain.com"
//! accounts = [""]
//!
//! [networks.hardhat]
//! accounts = { count = 10, initialIndex = 0, accountsBalance = "1000000000000000000000000000000000000000" }
//! forking = { url = "https://rpc.pulsechain.com", enabled = true }
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use chainkit_tools::config::Settings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load_file("chainkit.toml")?;
//! let pulse = settings.resolve_network("pulse")?;
//! println!("chain id: {:?}", pulse.chain_id);
//! # Ok(())
//! # }
//! ```

mod compiler;
mod document;
mod network;
mod wide;

pub use compiler::{CompilerProfile, OptimizerSettings};
pub use document::DocumentFormat;
pub use network::{
    AccountSeed, Accounts, ForkingConfig, GeneratedAccounts, NetworkProfile, PrivateKey,
    RpcEndpoint,
};
pub use wide::{ether, parse_u256};

use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Conventional name of the in-process simulator network
pub const LOCAL_NETWORK: &str = "hardhat";

/// Default document file name looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "chainkit.toml";

/// Validated, immutable toolchain settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    #[serde(rename = "defaultNetwork", skip_serializing_if = "Option::is_none")]
    default_network: Option<String>,
    compiler: CompilerProfile,
    networks: IndexMap<String, NetworkProfile>,
}

impl Settings {
    pub(crate) fn from_parts(
        compiler: CompilerProfile,
        networks: IndexMap<String, NetworkProfile>,
        default_network: Option<String>,
    ) -> Self {
        Settings {
            default_network,
            compiler,
            networks,
        }
    }

    /// Parse and validate an in-memory document.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Syntax`] if the document is not well-formed or has
    ///   the wrong shape
    /// - [`ConfigError::Validation`] naming the offending field (and network)
    ///   if a value is out of range
    pub fn load_str(source: &str, format: DocumentFormat) -> ConfigResult<Self> {
        let raw = document::parse(source, format)?;
        debug!("{} document parsed, validating", format);

        let settings = raw.into_settings()?;
        info!(
            compiler = %settings.compiler.version,
            networks = settings.networks.len(),
            "configuration loaded"
        );
        Ok(settings)
    }

    /// Read, parse and validate a document from disk.
    ///
    /// The format follows the file extension (`.toml` or `.json`).
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        info!("Loading configuration from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::load_str(&content, format)
    }

    pub fn compiler(&self) -> &CompilerProfile {
        &self.compiler
    }

    /// All networks, in document order.
    pub fn networks(&self) -> &IndexMap<String, NetworkProfile> {
        &self.networks
    }

    pub fn network_names(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    pub fn default_network(&self) -> Option<&str> {
        self.default_network.as_deref()
    }

    /// Look up a network by name.
    pub fn resolve_network(&self, name: &str) -> ConfigResult<&NetworkProfile> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork {
                name: name.to_string(),
                available: self.network_names().map(str::to_string).collect(),
            })
    }

    /// Network to act on when the caller may or may not name one.
    ///
    /// Precedence: explicit name, then `defaultNetwork`, then the local
    /// simulator network if declared.
    pub fn active_network(&self, requested: Option<&str>) -> ConfigResult<&NetworkProfile> {
        let name = requested
            .or(self.default_network.as_deref())
            .unwrap_or(LOCAL_NETWORK);
        self.resolve_network(name)
    }

    /// Serialize back to a TOML document that loads to an equal value.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Serialize back to a JSON document that loads to an equal value.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Serialize in the given document format.
    pub fn to_document(&self, format: DocumentFormat) -> ConfigResult<String> {
        match format {
            DocumentFormat::Toml => self.to_toml_string(),
            DocumentFormat::Json => self.to_json_string(),
        }
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════════╗");
        println!("║              TOOLCHAIN CONFIGURATION RESOLVED                  ║");
        println!("╚════════════════════════════════════════════════════════════════╝");
        println!("  Compiler:            {}", self.compiler);

        match self.default_network {
            Some(ref name) => println!("  Default Network:     {}", name),
            None => println!("  Default Network:     (not configured)"),
        }

        if self.networks.is_empty() {
            println!("  Networks:            (none)");
        }

        for profile in self.networks.values() {
            println!();
            print_network(profile);
        }

        println!("╚════════════════════════════════════════════════════════════════╝");
    }
}

/// Print one network profile in the summary layout.
pub fn print_network(profile: &NetworkProfile) {
    println!("  Network:             {} [{}]", profile.name, profile.kind());

    if let Some(chain_id) = profile.chain_id {
        println!("    Chain ID:          {}", chain_id);
    }
    if let Some(ref url) = profile.url {
        println!("    RPC URL:           {}", url);
    }
    if let Some(gas_price) = profile.gas_price_wei {
        println!("    Gas Price:         {} wei", gas_price);
    }

    match profile.accounts {
        Some(Accounts::Explicit(ref seeds)) => {
            println!(
                "    Accounts:          {} listed ({} resolved at runtime)",
                seeds.len(),
                profile.unset_seed_count()
            );
        }
        Some(Accounts::Generated(ref generated)) => {
            println!(
                "    Accounts:          {} generated from index {}, {} wei each",
                generated.count, generated.initial_index, generated.balance_wei
            );
        }
        None => println!("    Accounts:          (not configured)"),
    }

    if let Some(ref fork) = profile.forking {
        let state = if fork.enabled { "enabled" } else { "disabled" };
        match fork.block_number {
            Some(block) => println!("    Forking:           {} at block {} ({})", fork.url, block, state),
            None => println!("    Forking:           {} ({})", fork.url, state),
        }
    }
}
