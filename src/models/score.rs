use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::IdentityError;

/// Output of the Justice Algorithm for one wallet.
///
/// A plain value: two results built from the same inputs compare equal
/// bit for bit, which is what lets the identity cache reuse a generated
/// name when a wallet's numbers have not moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub wealth_score: f64,
    pub vitality_score: f64,
    pub community_score: f64,
    pub final_score: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Godly,     // 85-100
    Legendary, // 65-84
    Rare,      // 40-64
    Common,    // 0-39
}

impl Tier {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 85.0 => Tier::Godly,
            s if s >= 65.0 => Tier::Legendary,
            s if s >= 40.0 => Tier::Rare,
            _ => Tier::Common,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Godly => "GODLY",
            Tier::Legendary => "LEGENDARY",
            Tier::Rare => "RARE",
            Tier::Common => "COMMON",
        }
    }

    /// Title vocabulary handed to the name generator for this tier.
    pub fn title_words(&self) -> &'static [&'static str] {
        match self {
            Tier::Godly => &["Titan", "Apex", "Sovereign", "Legend"],
            Tier::Legendary => &["Champion", "Master", "Elite"],
            Tier::Rare => &["Warrior", "Explorer", "Voyager"],
            Tier::Common => &["Citizen", "Member", "User"],
        }
    }
}

impl FromStr for Tier {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GODLY" => Ok(Tier::Godly),
            "LEGENDARY" => Ok(Tier::Legendary),
            "RARE" => Ok(Tier::Rare),
            "COMMON" => Ok(Tier::Common),
            other => Err(IdentityError::InvalidInput(format!("Unknown tier {}", other))),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_score(100.0), Tier::Godly);
        assert_eq!(Tier::from_score(85.0), Tier::Godly);
        assert_eq!(Tier::from_score(84.999_999), Tier::Legendary);
        assert_eq!(Tier::from_score(65.0), Tier::Legendary);
        assert_eq!(Tier::from_score(64.99), Tier::Rare);
        assert_eq!(Tier::from_score(40.0), Tier::Rare);
        assert_eq!(Tier::from_score(39.99), Tier::Common);
        assert_eq!(Tier::from_score(0.0), Tier::Common);
    }

    #[test]
    fn test_tier_serializes_uppercase() {
        let json = serde_json::to_string(&Tier::Legendary).unwrap();
        assert_eq!(json, "\"LEGENDARY\"");

        let parsed: Tier = serde_json::from_str("\"GODLY\"").unwrap();
        assert_eq!(parsed, Tier::Godly);
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("rare".parse::<Tier>().unwrap(), Tier::Rare);
        assert_eq!(" Common ".parse::<Tier>().unwrap(), Tier::Common);
        assert!(matches!(
            "mythic".parse::<Tier>(),
            Err(IdentityError::InvalidInput(_))
        ));
    }
}
