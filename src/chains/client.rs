use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{Result, WalletMetrics};

/// Source of raw on-chain measurements for a wallet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Fetch balance, transaction count and supported-token holdings
    async fn fetch_metrics(&self, address: &str) -> Result<WalletMetrics>;

    /// Supported-token holdings only; zero balances are omitted
    async fn get_token_holdings(&self, address: &str) -> Result<BTreeMap<String, Decimal>>;
}

/// Configuration for chain clients
#[derive(Debug, Clone)]
pub struct ChainClientConfig {
    pub rpc_url: String,
    pub chain_id: Option<u64>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}
