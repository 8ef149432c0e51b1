use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Tokens on Base that count toward the community score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportedToken {
    Brett,
    Toshi,
    Degen,
    Aero,
    Usdc,
    BasePaint,
}

impl SupportedToken {
    pub const ALL: [SupportedToken; 6] = [
        SupportedToken::Brett,
        SupportedToken::Toshi,
        SupportedToken::Degen,
        SupportedToken::Aero,
        SupportedToken::Usdc,
        SupportedToken::BasePaint,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            SupportedToken::Brett => "BRETT",
            SupportedToken::Toshi => "TOSHI",
            SupportedToken::Degen => "DEGEN",
            SupportedToken::Aero => "AERO",
            SupportedToken::Usdc => "USDC",
            SupportedToken::BasePaint => "BASE_PAINT",
        }
    }

    /// Case-insensitive lookup; anything off the allow-list is `None`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let upper = symbol.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.symbol() == upper)
    }

    /// Contract address on Base mainnet.
    pub fn contract_address(&self) -> &'static str {
        match self {
            SupportedToken::Brett => "0x532f27101965dd16442E59d40670FaF5eBB142E4",
            SupportedToken::Toshi => "0xAC1Bd2486aAf3B5C0fc3Fd868558b082a531B2B4",
            SupportedToken::Degen => "0x4ed4E862860beD51a9570b96d89aF5E1B0Efefed",
            SupportedToken::Aero => "0x940181a94A35A4569E4529A3CDfB74e38FD98631",
            SupportedToken::Usdc => "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            SupportedToken::BasePaint => "0xba5e05cb26b78eda3a2f8e3b3814726305dcac83",
        }
    }

    pub fn decimals(&self) -> u32 {
        match self {
            SupportedToken::Usdc => 6,
            SupportedToken::BasePaint => 0,
            _ => 18,
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            SupportedToken::Brett => "🚀",
            SupportedToken::Toshi => "🐱",
            SupportedToken::Degen => "💎",
            SupportedToken::Aero => "✈️",
            SupportedToken::Usdc => "💵",
            SupportedToken::BasePaint => "🎨",
        }
    }
}

/// Raw on-chain measurements for one wallet, as returned by a chain client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletMetrics {
    pub address: String,
    pub balance_eth: Decimal,
    pub tx_count: u64,
    /// symbol -> amount, positive balances only
    pub holdings: BTreeMap<String, Decimal>,
}

impl WalletMetrics {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            balance_eth: Decimal::ZERO,
            tx_count: 0,
            holdings: BTreeMap::new(),
        }
    }

    pub fn held_symbols(&self) -> Vec<&str> {
        self.holdings
            .iter()
            .filter(|(_, amount)| **amount > Decimal::ZERO)
            .map(|(symbol, _)| symbol.as_str())
            .collect()
    }

    pub fn holds(&self, token: SupportedToken) -> bool {
        self.holdings
            .get(token.symbol())
            .map_or(false, |amount| *amount > Decimal::ZERO)
    }
}
