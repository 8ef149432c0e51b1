use ethers::types::Address;
use ethers::utils::to_checksum;

use crate::models::{IdentityError, Result};

/// A well-formed EVM address in its two canonical spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    /// Lowercase, used as the cache key.
    pub key: String,
    /// EIP-55 mixed case, used for display and RPC calls.
    pub checksum: String,
}

/// Validate and normalize a user-supplied address.
///
/// Accepts `0x` plus 40 hex digits. All-lowercase and all-uppercase input
/// is taken as-is; mixed case must match the EIP-55 checksum.
pub fn normalize(input: &str) -> Result<NormalizedAddress> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| IdentityError::InvalidAddress(format!("{} is missing the 0x prefix", trimmed)))?;

    if digits.len() != 40 {
        return Err(IdentityError::InvalidAddress(format!(
            "{} should have 40 hex digits, found {}",
            trimmed,
            digits.len()
        )));
    }

    let bytes = hex::decode(digits)
        .map_err(|e| IdentityError::InvalidAddress(format!("{}: {}", trimmed, e)))?;
    let address = Address::from_slice(&bytes);
    let checksum = to_checksum(&address, None);

    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());
    if mixed_case && checksum[2..] != *digits {
        return Err(IdentityError::InvalidAddress(format!(
            "{} fails checksum validation",
            trimmed
        )));
    }

    Ok(NormalizedAddress {
        key: format!("0x{}", digits.to_ascii_lowercase()),
        checksum,
    })
}

pub fn parse(input: &str) -> Result<Address> {
    let normalized = normalize(input)?;
    let bytes = hex::decode(&normalized.key[2..])
        .map_err(|e| IdentityError::InvalidAddress(format!("{}: {}", input, e)))?;
    Ok(Address::from_slice(&bytes))
}

/// Validate a transaction hash (`0x` + 64 hex digits) and lowercase it.
pub fn normalize_tx_hash(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| IdentityError::InvalidTxHash(trimmed.to_string()))?;

    if digits.len() != 64 || hex::decode(digits).is_err() {
        return Err(IdentityError::InvalidTxHash(trimmed.to_string()));
    }

    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}
