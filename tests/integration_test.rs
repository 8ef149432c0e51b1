use async_trait::async_trait;
use base_identity::{
    chains::ChainClient,
    identity::{IdentityGenerator, PlaceholderGenerator},
    models::{GeneratedIdentity, IdentityError, IdentitySource, Result, ScoreResult, Tier, WalletMetrics},
    scoring::{ScoringAlgorithm, ScoringWeights},
    service::IdentityService,
    storage::{IdentityStore, MemoryIdentityStore, SqliteIdentityStore},
    utils::address,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const WALLET: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

/// Chain client that serves a fixed wallet.
struct FixedChain {
    metrics: WalletMetrics,
}

#[async_trait]
impl ChainClient for FixedChain {
    async fn fetch_metrics(&self, _address: &str) -> Result<WalletMetrics> {
        Ok(self.metrics.clone())
    }

    async fn get_token_holdings(&self, _address: &str) -> Result<BTreeMap<String, Decimal>> {
        Ok(self.metrics.holdings.clone())
    }
}

/// Generator that counts calls.
#[derive(Default)]
struct CountingGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl IdentityGenerator for CountingGenerator {
    async fn generate(&self, score: &ScoreResult, _stats: &WalletMetrics) -> Result<GeneratedIdentity> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GeneratedIdentity {
            name: format!("{} Voyager #{}", score.tier, n),
            verdict: "Sails the L2 seas.".to_string(),
        })
    }
}

fn wallet(balance: Decimal, tx_count: u64, tokens: &[&str]) -> WalletMetrics {
    let mut metrics = WalletMetrics::new(WALLET);
    metrics.balance_eth = balance;
    metrics.tx_count = tx_count;
    for token in tokens {
        metrics.holdings.insert(token.to_string(), Decimal::ONE);
    }
    metrics
}

#[test]
fn test_reference_wallet_scores() {
    let algo = ScoringAlgorithm::default();

    let empty = algo.calculate::<&str>(0.0, 0, &[]).unwrap();
    assert_eq!(empty.final_score, 10.0);
    assert_eq!(empty.tier, Tier::Common);

    let whale = algo.calculate(50.0, 2000, &["BRETT", "DEGEN", "AERO"]).unwrap();
    assert_eq!(whale.final_score, 88.0);
    assert_eq!(whale.tier, Tier::Godly);

    assert_eq!(ScoringWeights::default().combine(60.0, 90.0, 50.0), 69.0);
    assert_eq!(Tier::from_score(69.0), Tier::Legendary);
}

#[test]
fn test_scoring_is_deterministic_and_monotonic() {
    let algo = ScoringAlgorithm::default();
    let tokens = ["USDC", "TOSHI"];

    let a = algo.calculate(1.5, 250, &tokens).unwrap();
    let b = algo.calculate(1.5, 250, &tokens).unwrap();
    assert_eq!(a.final_score.to_bits(), b.final_score.to_bits());
    assert_eq!(a, b);

    let mut previous = f64::MIN;
    for balance in [0.0, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 1000.0] {
        let score = algo.calculate(balance, 250, &tokens).unwrap().final_score;
        assert!(score >= previous, "score dropped at balance {}", balance);
        previous = score;
    }
}

#[test]
fn test_invalid_inputs_fail_fast() {
    let algo = ScoringAlgorithm::default();
    assert!(matches!(
        algo.calculate::<&str>(-0.1, 0, &[]),
        Err(IdentityError::InvalidInput(_))
    ));
    assert!(matches!(
        algo.calculate::<&str>(1.0, -1, &[]),
        Err(IdentityError::InvalidInput(_))
    ));
    assert_eq!(
        algo.calculate(1.0, 10, &["FAKE"]).unwrap(),
        algo.calculate::<&str>(1.0, 10, &[]).unwrap()
    );
}

#[test]
fn test_address_normalization() {
    let normalized = address::normalize(&WALLET.to_lowercase()).unwrap();
    assert_eq!(normalized.checksum, WALLET);
    assert_eq!(normalized.key, WALLET.to_lowercase());

    assert!(address::normalize("0x833589FCD6eDb6E08f4c7C32D4f71b54bdA02913").is_err());
    assert!(address::normalize("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913").is_err());
}

#[tokio::test]
async fn test_resolve_end_to_end_with_sqlite() {
    let store = Arc::new(SqliteIdentityStore::connect("sqlite::memory:", 1).await.unwrap());
    let generator = Arc::new(CountingGenerator::default());
    let chain = Arc::new(FixedChain {
        metrics: wallet(Decimal::new(25, 1), 120, &["BRETT"]),
    });

    let service = IdentityService::new(chain, ScoringAlgorithm::default(), generator.clone(), store.clone());

    let first = service.resolve(WALLET, false).await.unwrap();
    assert_eq!(first.source, IdentitySource::Generated);
    assert_eq!(first.record.tier, Tier::Rare);
    assert_eq!(first.record.scores.final_score, 54.0);
    assert_eq!(first.record.name, "RARE Voyager #1");

    let second = service.resolve(&WALLET.to_uppercase().replacen("0X", "0x", 1), false).await.unwrap();
    assert_eq!(second.source, IdentitySource::Cached);
    assert_eq!(second.record.name, "RARE Voyager #1");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    let tx_hash = format!("0x{}", "0f".repeat(32));
    let minted = service.mint(WALLET, &tx_hash).await.unwrap();
    assert!(minted.minted);

    let refreshed = service.resolve(WALLET, true).await.unwrap();
    assert_eq!(refreshed.record.name, "RARE Voyager #2");
    assert!(refreshed.record.minted);
    assert_eq!(refreshed.record.mint_tx_hash.as_deref(), Some(tx_hash.as_str()));

    let stored = store.get(&WALLET.to_lowercase()).await.unwrap().unwrap();
    assert_eq!(stored.name, "RARE Voyager #2");
}

#[tokio::test]
async fn test_placeholder_generator_service() {
    let service = IdentityService::new(
        Arc::new(FixedChain {
            metrics: wallet(Decimal::ZERO, 0, &[]),
        }),
        ScoringAlgorithm::default(),
        Arc::new(PlaceholderGenerator),
        Arc::new(MemoryIdentityStore::new()),
    );

    let outcome = service.resolve(WALLET, false).await.unwrap();
    assert_eq!(outcome.record.name, "Base COMMON Wallet");
    assert_eq!(outcome.record.verdict, "A common tier wallet on Base with 0 transactions.");
    assert!(service.lookup(WALLET).await.unwrap().is_some());
}
