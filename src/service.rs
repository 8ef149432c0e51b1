use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    chains::{BaseClient, ChainClient},
    config::Settings,
    identity::{GeminiGenerator, IdentityGenerator, PlaceholderGenerator},
    models::{
        GeneratedIdentity, IdentityError, IdentityOutcome, IdentityRecord, IdentitySource, Result,
        ScoreResult, WalletMetrics,
    },
    scoring::ScoringAlgorithm,
    storage::{IdentityStore, MemoryIdentityStore, SqliteIdentityStore},
    utils::address::{self, NormalizedAddress},
};

/// Name and verdict to keep when a cached identity is reused with fresh stats.
///
/// A placeholder verdict quotes the transaction count, so it is rebuilt
/// from the new numbers.
fn carried_identity(cached: &IdentityRecord, stats: &WalletMetrics) -> GeneratedIdentity {
    let stale_placeholder = GeneratedIdentity::placeholder(cached.tier, cached.stats.tx_count);
    if cached.name == stale_placeholder.name && cached.verdict == stale_placeholder.verdict {
        return GeneratedIdentity::placeholder(cached.tier, stats.tx_count);
    }

    GeneratedIdentity {
        name: cached.name.clone(),
        verdict: cached.verdict.clone(),
    }
}

/// Orchestrates fetch, score, cache and generation for a single wallet.
#[derive(Clone)]
pub struct IdentityService {
    chain: Arc<dyn ChainClient>,
    algorithm: ScoringAlgorithm,
    generator: Arc<dyn IdentityGenerator>,
    store: Arc<dyn IdentityStore>,
}

impl IdentityService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        algorithm: ScoringAlgorithm,
        generator: Arc<dyn IdentityGenerator>,
        store: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            chain,
            algorithm,
            generator,
            store,
        }
    }

    /// Wire up the production collaborators described by `settings`.
    ///
    /// With `ephemeral` set the identity cache lives in memory only.
    pub async fn from_settings(settings: &Settings, ephemeral: bool) -> Result<Self> {
        let chain: Arc<dyn ChainClient> = Arc::new(BaseClient::connect(&settings.rpc).await?);

        let generator: Arc<dyn IdentityGenerator> = match settings.generator_api_key() {
            Some(key) => Arc::new(GeminiGenerator::new(&settings.generator, key)?),
            None => {
                warn!(
                    "{} is not set, identities will use placeholder names",
                    settings.generator.api_key_env
                );
                Arc::new(PlaceholderGenerator)
            }
        };

        let store: Arc<dyn IdentityStore> = if ephemeral {
            info!("Using in-memory identity cache");
            Arc::new(MemoryIdentityStore::new())
        } else {
            Arc::new(
                SqliteIdentityStore::connect(&settings.database.url, settings.database.max_connections)
                    .await?,
            )
        };

        Ok(Self::new(chain, ScoringAlgorithm::default(), generator, store))
    }

    /// Score a wallet and return its identity, generating one when the cached
    /// record is missing, stale or a refresh is forced.
    pub async fn resolve(&self, input: &str, force_refresh: bool) -> Result<IdentityOutcome> {
        let normalized = address::normalize(input)?;

        let stats = self.chain.fetch_metrics(&normalized.checksum).await?;
        let scores = self.algorithm.score_wallet(&stats)?;

        if !force_refresh {
            if let Some(cached) = self.store.get(&normalized.key).await? {
                if cached.scores == scores {
                    info!("Cache hit for {}", normalized.checksum);
                    let identity = carried_identity(&cached, &stats);
                    let record = self.save(&normalized, stats, scores, identity).await?;
                    return Ok(IdentityOutcome {
                        record,
                        source: IdentitySource::Cached,
                    });
                }
                info!("Score changed for {}, regenerating identity", normalized.checksum);
            }
        }

        let identity = match self.generator.generate(&scores, &stats).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Identity generation failed for {}: {}", normalized.checksum, e);
                GeneratedIdentity::placeholder(scores.tier, stats.tx_count)
            }
        };

        let record = self.save(&normalized, stats, scores, identity).await?;

        info!(
            "{} is {} ({} tier, score {:.1})",
            record.checksum_address, record.name, record.tier, record.scores.final_score
        );

        Ok(IdentityOutcome {
            record,
            source: IdentitySource::Generated,
        })
    }

    async fn save(
        &self,
        normalized: &NormalizedAddress,
        stats: WalletMetrics,
        scores: ScoreResult,
        identity: GeneratedIdentity,
    ) -> Result<IdentityRecord> {
        let record = IdentityRecord::new(
            normalized.key.clone(),
            normalized.checksum.clone(),
            stats,
            scores,
            identity,
        );
        self.store.put(&record).await?;

        // Re-read so mint status carried over by the upsert is reflected
        Ok(self.store.get(&normalized.key).await?.unwrap_or(record))
    }

    /// Cached identity for a wallet without touching the chain.
    pub async fn lookup(&self, input: &str) -> Result<Option<IdentityRecord>> {
        let normalized = address::normalize(input)?;
        self.store.get(&normalized.key).await
    }

    /// Record the transaction that officialized a wallet's identity.
    pub async fn mint(&self, input: &str, tx_hash: &str) -> Result<IdentityRecord> {
        let normalized = address::normalize(input)?;
        let tx_hash = address::normalize_tx_hash(tx_hash)?;

        if !self.store.mark_minted(&normalized.key, &tx_hash).await? {
            return Err(IdentityError::NotFound(normalized.checksum));
        }

        info!("Identity for {} minted in {}", normalized.checksum, tx_hash);

        self.store
            .get(&normalized.key)
            .await?
            .ok_or(IdentityError::NotFound(normalized.checksum))
    }
}
