pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::models::{IdentityRecord, Result};

pub use memory::MemoryIdentityStore;
pub use sqlite::SqliteIdentityStore;

/// Persistent cache of generated identities keyed by lowercase address.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn get(&self, address: &str) -> Result<Option<IdentityRecord>>;

    /// Insert or replace the identity for `record.address`.
    ///
    /// Mint status of an existing row survives the replacement.
    async fn put(&self, record: &IdentityRecord) -> Result<()>;

    /// Mark an identity as minted. Returns `false` when no record exists.
    async fn mark_minted(&self, address: &str, tx_hash: &str) -> Result<bool>;
}
