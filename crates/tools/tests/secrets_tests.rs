//! Tests for resolving unset account keys after load

use chainkit_tools::{
    resolve_account_keys, ConfigError, DocumentFormat, MapSecretSource, Settings,
};

const FIXTURE_TOML: &str = include_str!("fixtures/chainkit.toml");

const DEPLOYER_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

#[test]
fn test_placeholder_keys_filled_per_network() {
    let settings = Settings::load_str(FIXTURE_TOML, DocumentFormat::Toml).unwrap();
    let source = MapSecretSource::new().with_key("testnet", 0, DEPLOYER_KEY);

    let testnet = settings.resolve_network("testnet").unwrap();
    let keys = resolve_account_keys(testnet, &source).unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].to_hex(), DEPLOYER_KEY);

    // Same source has nothing for pulse
    let pulse = settings.resolve_network("pulse").unwrap();
    let err = resolve_account_keys(pulse, &source).unwrap_err();
    assert!(matches!(err, ConfigError::MissingSecret { index: 0, .. }));
    assert_eq!(err.network(), Some("pulse"));
}

#[test]
fn test_simulator_network_needs_no_secrets() {
    let settings = Settings::load_str(FIXTURE_TOML, DocumentFormat::Toml).unwrap();
    let hardhat = settings.resolve_network("hardhat").unwrap();

    let keys = resolve_account_keys(hardhat, &MapSecretSource::new()).unwrap();
    assert!(keys.is_empty());
}

#[test]
fn test_loaded_settings_are_unchanged_by_resolution() {
    let settings = Settings::load_str(FIXTURE_TOML, DocumentFormat::Toml).unwrap();
    let before = settings.clone();
    let source = MapSecretSource::new().with_key("testnet", 0, DEPLOYER_KEY);

    let _ = resolve_account_keys(settings.resolve_network("testnet").unwrap(), &source).unwrap();
    assert_eq!(settings, before);
    assert_eq!(settings.resolve_network("testnet").unwrap().unset_seed_count(), 1);
}
