use std::collections::BTreeSet;

use rust_decimal::prelude::ToPrimitive;

use crate::{
    models::{IdentityError, Result, ScoreResult, SupportedToken, Tier, WalletMetrics},
    scoring::ScoringWeights,
};

/// (minimum balance in ETH, score), highest first.
const WEALTH_STEPS: [(f64, f64); 3] = [(10.0, 100.0), (1.0, 80.0), (0.1, 50.0)];
const WEALTH_FLOOR: f64 = 20.0;

/// (minimum transaction count, score), highest first.
const VITALITY_STEPS: [(i64, f64); 4] = [(1000, 100.0), (500, 85.0), (100, 60.0), (20, 40.0)];
const VITALITY_FLOOR: f64 = 10.0;

const COMMUNITY_POINTS_PER_TOKEN: f64 = 20.0;

/// The Justice Algorithm: three step curves and a weighted sum.
///
/// Holds no client or cache state; every method is a pure function of its
/// arguments.
#[derive(Debug, Clone)]
pub struct ScoringAlgorithm {
    weights: ScoringWeights,
}

impl Default for ScoringAlgorithm {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringAlgorithm {
    pub fn new(weights: ScoringWeights) -> Result<Self> {
        weights.validate().map_err(IdentityError::ConfigError)?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score raw measurements.
    ///
    /// Fails with `InvalidInput` on a negative or non-finite balance or a
    /// negative transaction count. Symbols outside the supported list are
    /// ignored.
    pub fn calculate<S: AsRef<str>>(
        &self,
        balance: f64,
        tx_count: i64,
        held_tokens: &[S],
    ) -> Result<ScoreResult> {
        if !balance.is_finite() {
            return Err(IdentityError::InvalidInput(format!(
                "balance must be a finite number, got {}",
                balance
            )));
        }
        if balance < 0.0 {
            return Err(IdentityError::InvalidInput(format!(
                "balance must be non-negative, got {}",
                balance
            )));
        }
        if tx_count < 0 {
            return Err(IdentityError::InvalidInput(format!(
                "transaction count must be non-negative, got {}",
                tx_count
            )));
        }

        let wealth_score = Self::wealth_score(balance);
        let vitality_score = Self::vitality_score(tx_count);
        let community_score = Self::community_score(held_tokens);

        let final_score = self
            .weights
            .combine(wealth_score, vitality_score, community_score)
            .clamp(0.0, 100.0);

        Ok(ScoreResult {
            wealth_score,
            vitality_score,
            community_score,
            final_score,
            tier: Tier::from_score(final_score),
        })
    }

    /// Score what a chain client returned. Tokens count only with a
    /// positive amount.
    pub fn score_wallet(&self, metrics: &WalletMetrics) -> Result<ScoreResult> {
        let balance = metrics.balance_eth.to_f64().ok_or_else(|| {
            IdentityError::InvalidInput(format!(
                "balance {} is not representable as a float",
                metrics.balance_eth
            ))
        })?;
        let tx_count = i64::try_from(metrics.tx_count).map_err(|_| {
            IdentityError::InvalidInput(format!(
                "transaction count {} is out of range",
                metrics.tx_count
            ))
        })?;

        self.calculate(balance, tx_count, &metrics.held_symbols())
    }

    pub fn wealth_score(balance: f64) -> f64 {
        WEALTH_STEPS
            .iter()
            .find(|(min, _)| balance >= *min)
            .map_or(WEALTH_FLOOR, |(_, score)| *score)
            .clamp(0.0, 100.0)
    }

    pub fn vitality_score(tx_count: i64) -> f64 {
        VITALITY_STEPS
            .iter()
            .find(|(min, _)| tx_count >= *min)
            .map_or(VITALITY_FLOOR, |(_, score)| *score)
            .clamp(0.0, 100.0)
    }

    pub fn community_score<S: AsRef<str>>(held_tokens: &[S]) -> f64 {
        let distinct: BTreeSet<SupportedToken> = held_tokens
            .iter()
            .filter_map(|symbol| SupportedToken::from_symbol(symbol.as_ref()))
            .collect();

        (distinct.len() as f64 * COMMUNITY_POINTS_PER_TOKEN).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_identical_inputs_identical_output() {
        let algo = ScoringAlgorithm::default();
        let a = algo.calculate(3.7, 420, &["BRETT", "AERO"]).unwrap();
        let b = algo.calculate(3.7, 420, &["BRETT", "AERO"]).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.final_score.to_bits(), b.final_score.to_bits());
        assert_eq!(a.wealth_score.to_bits(), b.wealth_score.to_bits());
    }

    #[test]
    fn test_balance_is_monotonic() {
        let algo = ScoringAlgorithm::default();
        let balances = [0.0, 0.01, 0.099, 0.1, 0.5, 0.999, 1.0, 5.0, 9.99, 10.0, 1_000_000.0];

        let mut previous: Option<ScoreResult> = None;
        for balance in balances {
            let score = algo.calculate(balance, 50, &["DEGEN"]).unwrap();
            if let Some(prev) = previous {
                assert!(score.wealth_score >= prev.wealth_score, "wealth dropped at {}", balance);
                assert!(score.final_score >= prev.final_score, "final dropped at {}", balance);
            }
            previous = Some(score);
        }
    }

    #[test]
    fn test_tx_count_is_monotonic() {
        let mut previous = 0.0;
        for tx_count in [0, 19, 20, 99, 100, 499, 500, 999, 1000, 50_000] {
            let score = ScoringAlgorithm::vitality_score(tx_count);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_curve_values() {
        assert_eq!(ScoringAlgorithm::wealth_score(0.0), 20.0);
        assert_eq!(ScoringAlgorithm::wealth_score(0.1), 50.0);
        assert_eq!(ScoringAlgorithm::wealth_score(1.0), 80.0);
        assert_eq!(ScoringAlgorithm::wealth_score(10.0), 100.0);

        assert_eq!(ScoringAlgorithm::vitality_score(0), 10.0);
        assert_eq!(ScoringAlgorithm::vitality_score(20), 40.0);
        assert_eq!(ScoringAlgorithm::vitality_score(100), 60.0);
        assert_eq!(ScoringAlgorithm::vitality_score(500), 85.0);
        assert_eq!(ScoringAlgorithm::vitality_score(1000), 100.0);
    }

    #[test]
    fn test_community_caps_at_100() {
        let all: Vec<&str> = SupportedToken::ALL.iter().map(|t| t.symbol()).collect();
        assert_eq!(ScoringAlgorithm::community_score(&all), 100.0);
        assert_eq!(ScoringAlgorithm::community_score(&["BRETT", "USDC"]), 40.0);
    }

    #[test]
    fn test_duplicate_symbols_count_once() {
        assert_eq!(
            ScoringAlgorithm::community_score(&["BRETT", "brett", "BRETT"]),
            20.0
        );
    }

    #[test]
    fn test_unsupported_tokens_ignored() {
        let algo = ScoringAlgorithm::default();
        let fake = algo.calculate(1.0, 100, &["FAKE"]).unwrap();
        let empty = algo.calculate(1.0, 100, &NONE).unwrap();

        assert_eq!(fake.community_score, empty.community_score);
        assert_eq!(fake, empty);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let algo = ScoringAlgorithm::default();

        let err = algo.calculate(-0.5, 10, &NONE).unwrap_err();
        assert!(matches!(err, IdentityError::InvalidInput(_)));

        let err = algo.calculate(1.0, -1, &NONE).unwrap_err();
        assert!(matches!(err, IdentityError::InvalidInput(_)));

        let err = algo.calculate(f64::NAN, 10, &NONE).unwrap_err();
        assert!(matches!(err, IdentityError::InvalidInput(_)));
    }

    #[test]
    fn test_weighted_example() {
        // 0.30*60 + 0.40*90 + 0.30*50 = 18 + 36 + 15
        let algo = ScoringAlgorithm::default();
        let final_score = algo.weights().combine(60.0, 90.0, 50.0);

        assert_eq!(final_score, 69.0);
        assert_eq!(Tier::from_score(final_score), Tier::Legendary);
    }

    #[test]
    fn test_whale_tiers() {
        let algo = ScoringAlgorithm::default();
        let score = algo
            .calculate(25.0, 1500, &["BRETT", "TOSHI", "DEGEN", "FAKE"])
            .unwrap();

        assert_eq!(score.community_score, 60.0);
        assert_eq!(score.final_score, 88.0);
        assert_eq!(score.tier, Tier::Godly);

        let fewer_tokens = algo.calculate(25.0, 1500, &["BRETT", "TOSHI"]).unwrap();
        assert_eq!(fewer_tokens.final_score, 82.0);
        assert_eq!(fewer_tokens.tier, Tier::Legendary);
    }

    #[test]
    fn test_empty_wallet_is_common() {
        let algo = ScoringAlgorithm::default();
        let score = algo.calculate(0.0, 0, &NONE).unwrap();

        // 0.3*20 + 0.4*10 + 0
        assert_eq!(score.final_score, 10.0);
        assert_eq!(score.tier, Tier::Common);
    }

    #[test]
    fn test_score_wallet_uses_positive_holdings() {
        let algo = ScoringAlgorithm::default();
        let mut metrics = WalletMetrics::new("0x0000000000000000000000000000000000000001");
        metrics.balance_eth = Decimal::new(25, 1); // 2.5
        metrics.tx_count = 600;
        metrics.holdings.insert("BRETT".to_string(), Decimal::from(1000));
        metrics.holdings.insert("USDC".to_string(), Decimal::ZERO);

        let score = algo.score_wallet(&metrics).unwrap();
        assert_eq!(score.wealth_score, 80.0);
        assert_eq!(score.vitality_score, 85.0);
        assert_eq!(score.community_score, 20.0);
        assert_eq!(score.final_score, 64.0);
        assert_eq!(score.tier, Tier::Rare);
    }

    #[test]
    fn test_score_wallet_rejects_negative_balance() {
        let algo = ScoringAlgorithm::default();
        let mut metrics = WalletMetrics::new("0x0000000000000000000000000000000000000001");
        metrics.balance_eth = Decimal::new(-1, 0);

        assert!(matches!(
            algo.score_wallet(&metrics),
            Err(IdentityError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoringWeights { wealth: 10, vitality: 10, community: 10 };
        assert!(ScoringAlgorithm::new(weights).is_err());
    }
}
