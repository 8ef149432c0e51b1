use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{transaction::eip2718::TypedTransaction, Address, TransactionRequest, U256},
    utils::format_units,
};
use futures::future::join_all;
use reqwest::Url;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    chains::{
        client::{ChainClient, ChainClientConfig},
        resilience::{retry_with_backoff, timeout_error, RetryConfig},
    },
    config::RpcConfig,
    models::{IdentityError, Result, SupportedToken, WalletMetrics},
    utils::address,
};

const CHAIN_NAME: &str = "base";

/// ERC20 balanceOf(address) selector
const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// JSON-RPC client for Base mainnet.
pub struct BaseClient {
    provider: Arc<Provider<Http>>,
    retry: RetryConfig,
    request_timeout: Duration,
    tokens: Vec<(SupportedToken, Address)>,
}

fn rpc_error(context: &str, e: impl std::fmt::Display) -> IdentityError {
    IdentityError::RpcError {
        chain: CHAIN_NAME.to_string(),
        message: format!("{}: {}", context, e),
    }
}

async fn rpc_call<T, E, Fut>(limit: Duration, context: &str, call: Fut) -> Result<T>
where
    E: std::fmt::Display,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(|e| rpc_error(context, e)),
        Err(_) => Err(timeout_error(CHAIN_NAME)),
    }
}

impl BaseClient {
    pub async fn new(config: ChainClientConfig) -> Result<Self> {
        let url = Url::parse(&config.rpc_url)
            .map_err(|e| IdentityError::ConfigError(format!("Invalid RPC URL {}: {}", config.rpc_url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let provider = Arc::new(Provider::new(Http::new_with_client(url, http_client)));
        let retry = RetryConfig::with_max_attempts(config.max_retries);
        let request_timeout = Duration::from_secs(config.timeout_seconds);

        // Verify chain ID matches
        let chain_id = retry_with_backoff(&retry, "eth_chainId", || {
            let provider = provider.clone();
            async move { rpc_call(request_timeout, "Failed to get chain ID", provider.get_chainid()).await }
        })
        .await?;

        if let Some(expected_id) = config.chain_id {
            if chain_id != U256::from(expected_id) {
                return Err(IdentityError::ConfigError(format!(
                    "Chain ID mismatch: expected {}, got {}",
                    expected_id, chain_id
                )));
            }
        }

        let tokens = SupportedToken::ALL
            .iter()
            .map(|token| {
                Address::from_str(token.contract_address())
                    .map(|addr| (*token, addr))
                    .map_err(|_| {
                        IdentityError::ConfigError(format!("Invalid {} contract address", token.symbol()))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            provider,
            retry,
            request_timeout,
            tokens,
        })
    }

    /// Connect to the first endpoint that answers, in priority order.
    pub async fn connect(rpc: &RpcConfig) -> Result<Self> {
        let mut last_error = None;

        for endpoint in rpc.endpoints_by_priority() {
            let config = ChainClientConfig {
                rpc_url: endpoint.url.clone(),
                chain_id: Some(rpc.chain_id),
                timeout_seconds: rpc.timeout_seconds,
                max_retries: rpc.max_retries,
            };

            match Self::new(config).await {
                Ok(client) => {
                    info!("Connected to {} ({})", endpoint.name, endpoint.url);
                    return Ok(client);
                }
                Err(e) => {
                    warn!("RPC endpoint {} unavailable: {}", endpoint.name, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            IdentityError::ConfigError("No RPC endpoints configured".to_string())
        }))
    }

    async fn get_token_balance(&self, holder: Address, token: Address) -> Result<U256> {
        let mut call_data = BALANCE_OF_SELECTOR.to_vec();

        // Encode the holder address (32 bytes, left-padded)
        let mut holder_bytes = [0u8; 32];
        holder_bytes[12..].copy_from_slice(holder.as_bytes());
        call_data.extend_from_slice(&holder_bytes);

        let call_req = TypedTransaction::Legacy(TransactionRequest {
            to: Some(token.into()),
            data: Some(call_data.into()),
            ..Default::default()
        });

        let result = retry_with_backoff(&self.retry, "balanceOf", || {
            let provider = self.provider.clone();
            let call_req = call_req.clone();
            let limit = self.request_timeout;
            async move { rpc_call(limit, "Failed to call balanceOf", provider.call(&call_req, None)).await }
        })
        .await?;

        if result.len() >= 32 {
            Ok(U256::from_big_endian(&result[..32]))
        } else {
            Ok(U256::zero())
        }
    }
}

/// Scale a raw integer amount by `decimals` into a human readable decimal.
pub fn to_decimal(raw: U256, decimals: u32) -> Result<Decimal> {
    let formatted = if decimals == 0 {
        raw.to_string()
    } else {
        format_units(raw, decimals)
            .map_err(|e| IdentityError::InvalidInput(format!("Cannot scale {}: {}", raw, e)))?
    };

    Decimal::from_str(&formatted)
        .map_err(|e| IdentityError::InvalidInput(format!("Cannot represent {}: {}", formatted, e)))
}

#[async_trait]
impl ChainClient for BaseClient {
    async fn fetch_metrics(&self, address: &str) -> Result<WalletMetrics> {
        let addr = address::parse(address)?;

        let balance = retry_with_backoff(&self.retry, "eth_getBalance", || {
            let provider = self.provider.clone();
            let limit = self.request_timeout;
            async move { rpc_call(limit, "Failed to get balance", provider.get_balance(addr, None)).await }
        })
        .await?;

        let tx_count = retry_with_backoff(&self.retry, "eth_getTransactionCount", || {
            let provider = self.provider.clone();
            let limit = self.request_timeout;
            async move {
                rpc_call(limit, "Failed to get transaction count", provider.get_transaction_count(addr, None)).await
            }
        })
        .await?;

        if tx_count > U256::from(u64::MAX) {
            return Err(IdentityError::InvalidInput(format!(
                "transaction count {} is out of range",
                tx_count
            )));
        }

        let mut metrics = WalletMetrics::new(ethers::utils::to_checksum(&addr, None));
        metrics.balance_eth = to_decimal(balance, 18)?;
        metrics.tx_count = tx_count.as_u64();
        metrics.holdings = self.get_token_holdings(address).await?;

        info!(
            "Address: {}, balance: {} ETH, TX count: {}, tokens: {}",
            metrics.address,
            metrics.balance_eth,
            metrics.tx_count,
            metrics.holdings.len()
        );

        Ok(metrics)
    }

    async fn get_token_holdings(&self, address: &str) -> Result<BTreeMap<String, Decimal>> {
        let holder = address::parse(address)?;

        let lookups = self.tokens.iter().map(|(token, contract)| async move {
            match self.get_token_balance(holder, *contract).await {
                Ok(raw) if !raw.is_zero() => match to_decimal(raw, token.decimals()) {
                    Ok(amount) => Some((token.symbol().to_string(), amount)),
                    Err(e) => {
                        warn!("Failed to scale {} balance: {}", token.symbol(), e);
                        None
                    }
                },
                Ok(_) => None,
                Err(e) => {
                    // A token we cannot read counts as not held
                    warn!("Failed to check {} balance: {}", token.symbol(), e);
                    None
                }
            }
        });

        let holdings: BTreeMap<String, Decimal> = join_all(lookups).await.into_iter().flatten().collect();
        debug!("Found {} supported tokens for {}", holdings.len(), address);

        Ok(holdings)
    }
}
