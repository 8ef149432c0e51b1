pub mod gemini;
pub mod prompt;

use async_trait::async_trait;

use crate::models::{GeneratedIdentity, Result, ScoreResult, WalletMetrics};

pub use gemini::GeminiGenerator;

/// Produces a creative name and one-sentence verdict for a scored wallet.
///
/// Implementations may fail or time out; callers fall back to
/// [`GeneratedIdentity::placeholder`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGenerator: Send + Sync {
    async fn generate(&self, score: &ScoreResult, stats: &WalletMetrics) -> Result<GeneratedIdentity>;
}

/// Generator used when no LLM credentials are configured.
#[derive(Debug, Default, Clone)]
pub struct PlaceholderGenerator;

#[async_trait]
impl IdentityGenerator for PlaceholderGenerator {
    async fn generate(&self, score: &ScoreResult, stats: &WalletMetrics) -> Result<GeneratedIdentity> {
        Ok(GeneratedIdentity::placeholder(score.tier, stats.tx_count))
    }
}
