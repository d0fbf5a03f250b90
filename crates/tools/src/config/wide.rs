//! Wide integer values (balances, gas prices)
//!
//! Wei amounts routinely exceed 64 bits, so they are held as [`U256`] and
//! written back as decimal strings. Documents may give them either as native
//! integers or as strings; floats are refused since they cannot carry the
//! full precision.

use alloy_primitives::U256;
use serde::Deserialize;
use std::str::FromStr;

/// A wide integer as it appears in the document, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawWide {
    Int(i64),
    Unsigned(u64),
    Text(String),
    Float(f64),
}

impl RawWide {
    /// Parse into a non-negative [`U256`], returning the rejection reason on failure.
    pub(crate) fn to_u256(&self) -> Result<U256, String> {
        match self {
            RawWide::Int(value) if *value < 0 => {
                Err(format!("must be a non-negative integer, got {value}"))
            }
            RawWide::Int(value) => Ok(U256::from(value.unsigned_abs())),
            RawWide::Unsigned(value) => Ok(U256::from(*value)),
            RawWide::Text(text) => parse_u256(text),
            // Integer literals past u64 reach us as floats from JSON parsers
            RawWide::Float(value) if value.fract() == 0.0 && value.abs() > u64::MAX as f64 => {
                Err("integer literal is too wide for a native number; quote it as a decimal string"
                    .to_string())
            }
            RawWide::Float(value) => Err(format!(
                "must be an integer or an integer string, got floating-point {value}"
            )),
        }
    }
}

/// Parse a decimal or `0x`-prefixed hex string into a [`U256`].
pub fn parse_u256(text: &str) -> Result<U256, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("must not be empty".to_string());
    }
    if trimmed.starts_with('-') {
        return Err(format!("must be a non-negative integer, got {trimmed}"));
    }
    U256::from_str(trimmed).map_err(|e| format!("invalid integer {trimmed:?}: {e}"))
}

/// Serializer for a [`U256`] as a decimal string
pub(crate) fn serialize_u256<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Serializer for an optional [`U256`] as a decimal string
pub(crate) fn serialize_opt_u256<S>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(value) => serializer.serialize_some(&value.to_string()),
        None => serializer.serialize_none(),
    }
}

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// `amount` ether expressed in wei.
pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(WEI_PER_ETHER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_beyond_u128() {
        let value = parse_u256("1000000000000000000000000000000000000000").unwrap();
        assert!(value > U256::from(u128::MAX));
        assert_eq!(value.to_string(), "1000000000000000000000000000000000000000");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_u256("0xff").unwrap(), U256::from(255u64));
    }

    #[test]
    fn test_parse_rejects_negative_and_garbage() {
        assert!(parse_u256("-1").is_err());
        assert!(parse_u256("").is_err());
        assert!(parse_u256("12abc").is_err());
    }

    #[test]
    fn test_raw_int_and_float() {
        assert_eq!(
            RawWide::Int(50_000_000_000).to_u256().unwrap(),
            U256::from(50_000_000_000u64)
        );
        assert!(RawWide::Int(-5).to_u256().is_err());
        assert!(RawWide::Float(1.5).to_u256().unwrap_err().contains("floating-point"));
    }

    #[test]
    fn test_raw_float_beyond_u64_asks_for_string() {
        let reason = RawWide::Float(1e39).to_u256().unwrap_err();
        assert!(reason.contains("quote it as a decimal string"), "{reason}");
    }

    #[test]
    fn test_ether() {
        assert_eq!(ether(1).to_string(), "1000000000000000000");
        assert_eq!(ether(10_000).to_string(), "10000000000000000000000");
    }
}
