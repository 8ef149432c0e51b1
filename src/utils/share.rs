use ethers::utils::parse_ether;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    config::{MintSettings, ShareSettings},
    models::{IdentityError, IdentityRecord, Result},
};

const TWEET_INTENT: &str = "https://twitter.com/intent/tweet";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLinks {
    pub profile_url: String,
    pub share_url: String,
    /// EIP-681 payment request for officializing the identity.
    pub mint_uri: String,
}

impl ShareLinks {
    pub fn for_record(
        share: &ShareSettings,
        mint: &MintSettings,
        record: &IdentityRecord,
    ) -> Result<Self> {
        let profile_url = profile_url(&share.base_url, &record.checksum_address);
        let share_url = share_intent_url(
            &record.name,
            record.tier.as_str(),
            &profile_url,
            &share.hashtags,
        )?;
        let mint_uri = mint_payment_uri(&mint.recipient, mint.price_eth)?;

        Ok(Self {
            profile_url,
            share_url,
            mint_uri,
        })
    }
}

pub fn profile_url(base_url: &str, checksum_address: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), checksum_address)
}

pub fn share_intent_url(
    name: &str,
    tier: &str,
    profile_url: &str,
    hashtags: &[String],
) -> Result<String> {
    let text = format!(
        "🔷 I'm {}, a {} tier identity on Base L2! Check out Base Identity Protocol:",
        name, tier
    );
    let tags = hashtags.join(",");

    let url = Url::parse_with_params(
        TWEET_INTENT,
        &[("text", text.as_str()), ("url", profile_url), ("hashtags", tags.as_str())],
    )
    .map_err(|e| IdentityError::ConfigError(format!("Invalid share URL: {}", e)))?;

    Ok(url.to_string())
}

pub fn mint_payment_uri(recipient: &str, price_eth: f64) -> Result<String> {
    let wei = parse_ether(price_eth)
        .map_err(|e| IdentityError::ConfigError(format!("Invalid mint price {}: {}", price_eth, e)))?;
    Ok(format!("ethereum:{}?value={}", recipient, wei))
}
