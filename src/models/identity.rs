use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::{ScoreResult, Tier, WalletMetrics};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedIdentity {
    #[serde(default = "GeneratedIdentity::default_name")]
    pub name: String,
    #[serde(default = "GeneratedIdentity::default_verdict")]
    pub verdict: String,
}

impl GeneratedIdentity {
    fn default_name() -> String {
        "Unknown Identity".to_string()
    }

    fn default_verdict() -> String {
        "A wallet on Base.".to_string()
    }

    /// Stand-in used whenever the generator is unavailable or fails.
    pub fn placeholder(tier: Tier, tx_count: u64) -> Self {
        Self {
            name: format!("Base {} Wallet", tier.as_str()),
            verdict: format!(
                "A {} tier wallet on Base with {} transactions.",
                tier.as_str().to_lowercase(),
                tx_count
            ),
        }
    }
}

/// A cached identity as stored by an [`IdentityStore`](crate::storage::IdentityStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Lowercase address, the cache key.
    pub address: String,
    pub checksum_address: String,
    pub name: String,
    pub tier: Tier,
    pub verdict: String,
    pub stats: WalletMetrics,
    pub scores: ScoreResult,
    pub minted: bool,
    pub mint_tx_hash: Option<String>,
    pub minted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl IdentityRecord {
    pub fn new(
        address: String,
        checksum_address: String,
        stats: WalletMetrics,
        scores: ScoreResult,
        identity: GeneratedIdentity,
    ) -> Self {
        Self {
            address,
            checksum_address,
            name: identity.name,
            tier: scores.tier,
            verdict: identity.verdict,
            stats,
            scores,
            minted: false,
            mint_tx_hash: None,
            minted_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentitySource {
    Cached,
    Generated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityOutcome {
    pub record: IdentityRecord,
    pub source: IdentitySource,
}
