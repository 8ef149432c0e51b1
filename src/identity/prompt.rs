use rust_decimal::prelude::ToPrimitive;

use crate::models::{ScoreResult, SupportedToken, Tier, WalletMetrics};

pub fn system_instruction() -> String {
    let tier_lines: Vec<String> = [Tier::Godly, Tier::Legendary, Tier::Rare, Tier::Common]
        .iter()
        .map(|tier| format!("- {}: {}", tier.as_str(), tier.title_words().join(", ")))
        .collect();

    format!(
        "You judge wallets on the Base L2 network by their on-chain record.\n\
         Give the wallet a creative title of two to four words and a single-sentence verdict.\n\
         Draw the title from the vocabulary of its tier:\n{}\n\
         Holding BRETT earns a 'Degen' or 'Based' flavour; holding BASE_PAINT earns an 'Art' or 'Creator' flavour.\n\
         The verdict should mention activity, wealth or community and stay accurate.\n\
         Reply with a JSON object containing exactly the keys \"name\" and \"verdict\".",
        tier_lines.join("\n")
    )
}

pub fn wallet_summary(score: &ScoreResult, stats: &WalletMetrics) -> String {
    let held = stats.held_symbols();
    let tokens = if held.is_empty() {
        "None".to_string()
    } else {
        held.join(", ")
    };

    let mut hints = Vec::new();
    if stats.holds(SupportedToken::Brett) {
        hints.push("holds BRETT");
    }
    if stats.holds(SupportedToken::BasePaint) {
        hints.push("holds BASE_PAINT");
    }

    format!(
        "Tier: {}\n\
         ETH Balance: {:.4} ETH\n\
         Transaction Count: {}\n\
         Tokens Held: {}\n\
         Wealth Score: {}/100\n\
         Vitality Score: {}/100\n\
         Community Score: {}/100\n\
         Notes: {}",
        score.tier,
        stats.balance_eth.to_f64().unwrap_or_default(),
        stats.tx_count,
        tokens,
        score.wealth_score,
        score.vitality_score,
        score.community_score,
        if hints.is_empty() { "none".to_string() } else { hints.join("; ") },
    )
}
