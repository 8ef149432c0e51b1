use serde::{Deserialize, Serialize};

/// Percentage weights of the three sub-scores. Must sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub wealth: u32,
    pub vitality: u32,
    pub community: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            wealth: 30,
            vitality: 40,
            community: 30,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> u64 {
        u64::from(self.wealth) + u64::from(self.vitality) + u64::from(self.community)
    }

    pub fn validate(&self) -> Result<(), String> {
        let total = self.total();
        if total != 100 {
            return Err(format!("Weights must sum to 100, got {}", total));
        }

        Ok(())
    }

    /// Weighted average of sub-scores already in [0,100].
    ///
    /// Divides once at the end so integer-valued sub-scores give an exact
    /// result (30*60 + 40*90 + 30*50 is 6900, not 68.99999...).
    pub fn combine(&self, wealth: f64, vitality: f64, community: f64) -> f64 {
        (f64::from(self.wealth) * wealth
            + f64::from(self.vitality) * vitality
            + f64::from(self.community) * community)
            / 100.0
    }
}
