use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{
    models::{IdentityError, IdentityRecord, Result},
    storage::IdentityStore,
};

/// In-memory identity cache, used for `--ephemeral` runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryIdentityStore {
    records: Arc<RwLock<HashMap<String, IdentityRecord>>>,
}

fn poisoned() -> IdentityError {
    IdentityError::StorageError("identity cache lock poisoned".to_string())
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn get(&self, address: &str) -> Result<Option<IdentityRecord>> {
        let cache = self.records.read().map_err(|_| poisoned())?;
        Ok(cache.get(address).cloned())
    }

    async fn put(&self, record: &IdentityRecord) -> Result<()> {
        let mut cache = self.records.write().map_err(|_| poisoned())?;
        let mut record = record.clone();

        if let Some(existing) = cache.get(&record.address) {
            record.minted = existing.minted;
            record.mint_tx_hash = existing.mint_tx_hash.clone();
            record.minted_at = existing.minted_at;
        }

        cache.insert(record.address.clone(), record);
        Ok(())
    }

    async fn mark_minted(&self, address: &str, tx_hash: &str) -> Result<bool> {
        let mut cache = self.records.write().map_err(|_| poisoned())?;

        match cache.get_mut(address) {
            Some(record) => {
                record.minted = true;
                record.mint_tx_hash = Some(tx_hash.to_string());
                record.minted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneratedIdentity, ScoreResult, Tier, WalletMetrics};

    fn record(address: &str, name: &str) -> IdentityRecord {
        let scores = ScoreResult {
            wealth_score: 50.0,
            vitality_score: 40.0,
            community_score: 0.0,
            final_score: 31.0,
            tier: Tier::Common,
        };
        IdentityRecord::new(
            address.to_string(),
            address.to_string(),
            WalletMetrics::new(address),
            scores,
            GeneratedIdentity {
                name: name.to_string(),
                verdict: "Quiet.".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryIdentityStore::new();
        assert!(store.is_empty());
        assert!(store.get("0xabc").await.unwrap().is_none());

        store.put(&record("0xabc", "First")).await.unwrap();
        let fetched = store.get("0xabc").await.unwrap().unwrap();
        assert_eq!(fetched.name, "First");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_put_preserves_mint_status() {
        let store = MemoryIdentityStore::new();
        store.put(&record("0xabc", "First")).await.unwrap();
        assert!(store.mark_minted("0xabc", "0xfeed").await.unwrap());

        store.put(&record("0xabc", "Second")).await.unwrap();
        let fetched = store.get("0xabc").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Second");
        assert!(fetched.minted);
        assert_eq!(fetched.mint_tx_hash.as_deref(), Some("0xfeed"));
        assert!(fetched.minted_at.is_some());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_a_storage_error() {
        let store = MemoryIdentityStore::new();
        let records = store.records.clone();
        let _ = std::thread::spawn(move || {
            let _guard = records.write().unwrap();
            panic!("writer died");
        })
        .join();

        assert!(matches!(
            store.get("0xabc").await,
            Err(IdentityError::StorageError(_))
        ));
        assert!(matches!(
            store.put(&record("0xabc", "First")).await,
            Err(IdentityError::StorageError(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_minted_unknown_address() {
        let store = MemoryIdentityStore::new();
        assert!(!store.mark_minted("0xdead", "0xfeed").await.unwrap());
    }
}
