use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};
use std::str::FromStr;
use tracing::{debug, info};

use crate::{
    models::{IdentityError, IdentityRecord, Result, Tier},
    storage::IdentityStore,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS identities (
    address TEXT PRIMARY KEY,
    checksum_address TEXT NOT NULL,
    name TEXT NOT NULL,
    tier TEXT NOT NULL,
    verdict TEXT NOT NULL,
    stats TEXT NOT NULL,
    scores TEXT NOT NULL,
    minted INTEGER NOT NULL DEFAULT 0,
    mint_tx_hash TEXT,
    minted_at TEXT,
    created_at TEXT NOT NULL
)
"#;

const UPSERT: &str = r#"
INSERT INTO identities
    (address, checksum_address, name, tier, verdict, stats, scores, minted, mint_tx_hash, minted_at, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, 0, NULL, NULL, ?)
ON CONFLICT(address) DO UPDATE SET
    checksum_address = excluded.checksum_address,
    name = excluded.name,
    tier = excluded.tier,
    verdict = excluded.verdict,
    stats = excluded.stats,
    scores = excluded.scores,
    created_at = excluded.created_at
"#;

/// SQLite-backed identity cache.
#[derive(Debug, Clone)]
pub struct SqliteIdentityStore {
    pool: SqlitePool,
}

impl SqliteIdentityStore {
    /// Open (creating if needed) the database at `url` and ensure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("Identity cache ready at {}", url);
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| IdentityError::InvalidInput(format!("Bad timestamp {}: {}", value, e)))
}

fn record_from_row(row: &SqliteRow) -> Result<IdentityRecord> {
    let tier: String = row.try_get("tier")?;
    let stats: String = row.try_get("stats")?;
    let scores: String = row.try_get("scores")?;
    let minted: i64 = row.try_get("minted")?;
    let minted_at: Option<String> = row.try_get("minted_at")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(IdentityRecord {
        address: row.try_get("address")?,
        checksum_address: row.try_get("checksum_address")?,
        name: row.try_get("name")?,
        tier: tier.parse::<Tier>()?,
        verdict: row.try_get("verdict")?,
        stats: serde_json::from_str(&stats)?,
        scores: serde_json::from_str(&scores)?,
        minted: minted != 0,
        mint_tx_hash: row.try_get("mint_tx_hash")?,
        minted_at: minted_at.as_deref().map(parse_timestamp).transpose()?,
        created_at: parse_timestamp(&created_at)?,
    })
}

#[async_trait]
impl IdentityStore for SqliteIdentityStore {
    async fn get(&self, address: &str) -> Result<Option<IdentityRecord>> {
        let row = sqlx::query("SELECT * FROM identities WHERE address = ?")
            .bind(address)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn put(&self, record: &IdentityRecord) -> Result<()> {
        let stats = serde_json::to_string(&record.stats)?;
        let scores = serde_json::to_string(&record.scores)?;

        sqlx::query(UPSERT)
            .bind(&record.address)
            .bind(&record.checksum_address)
            .bind(&record.name)
            .bind(record.tier.as_str())
            .bind(&record.verdict)
            .bind(stats)
            .bind(scores)
            .bind(record.created_at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        debug!("Cached identity for {}", record.address);
        Ok(())
    }

    async fn mark_minted(&self, address: &str, tx_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE identities SET minted = 1, mint_tx_hash = ?, minted_at = ? WHERE address = ?",
        )
        .bind(tx_hash)
        .bind(Utc::now().to_rfc3339())
        .bind(address)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneratedIdentity, ScoreResult, WalletMetrics};
    use rust_decimal::Decimal;

    async fn memory_store() -> SqliteIdentityStore {
        SqliteIdentityStore::connect("sqlite::memory:", 1).await.unwrap()
    }

    fn record(name: &str) -> IdentityRecord {
        let mut stats = WalletMetrics::new("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
        stats.balance_eth = Decimal::new(25, 1);
        stats.tx_count = 120;
        stats.holdings.insert("BRETT".to_string(), Decimal::from(1000));

        let scores = ScoreResult {
            wealth_score: 70.0,
            vitality_score: 90.0,
            community_score: 20.0,
            final_score: 63.0,
            tier: Tier::Rare,
        };

        IdentityRecord::new(
            "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913".to_string(),
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
            stats,
            scores,
            GeneratedIdentity {
                name: name.to_string(),
                verdict: "Busy and based.".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_round_trip_record() {
        let store = memory_store().await;
        let original = record("Degen Voyager");
        store.put(&original).await.unwrap();

        let fetched = store.get(&original.address).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Degen Voyager");
        assert_eq!(fetched.tier, Tier::Rare);
        assert_eq!(fetched.scores, original.scores);
        assert_eq!(fetched.stats.tx_count, 120);
        assert_eq!(fetched.stats.holdings.get("BRETT"), Some(&Decimal::from(1000)));
        assert!(!fetched.minted);
        assert_eq!(fetched.created_at.timestamp(), original.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_missing_record() {
        let store = memory_store().await;
        assert!(store.get("0x0000000000000000000000000000000000000000").await.unwrap().is_none());
        assert!(!store.mark_minted("0xnone", "0xfeed").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_keeps_mint_status() {
        let store = memory_store().await;
        let first = record("First Name");
        store.put(&first).await.unwrap();
        assert!(store.mark_minted(&first.address, "0xabc123").await.unwrap());

        store.put(&record("Second Name")).await.unwrap();
        let fetched = store.get(&first.address).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Second Name");
        assert!(fetched.minted);
        assert_eq!(fetched.mint_tx_hash.as_deref(), Some("0xabc123"));
        assert!(fetched.minted_at.is_some());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = memory_store().await;
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();
    }
}
