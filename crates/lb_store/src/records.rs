//! The store contract consumed by the transfer core.

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use lb_proto::AccountRecord;

use crate::error::StoreError;

/// A lazy, single-pass scan of the whole record set. The producer fills a
/// bounded channel, so a slow consumer suspends the scan instead of buffering
/// it. Restartable only by calling `scan_all` again.
pub type RecordScan = mpsc::Receiver<Result<AccountRecord, StoreError>>;

/// Normalise a login handle (username or email) for index lookups.
pub fn normalize_login(login: &str) -> String {
    login.trim().to_lowercase()
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<AccountRecord>, StoreError>;

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Insert a record whose id must not already exist.
    async fn create(&self, record: &AccountRecord) -> Result<(), StoreError>;

    /// Write a whole record, replacing any existing one with the same id.
    async fn save(&self, record: &AccountRecord) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Look a record up by normalised username or email.
    async fn get_by_login(&self, login: &str) -> Result<Option<AccountRecord>, StoreError>;

    /// Begin a full scan. Order is not semantically significant but is stable
    /// within one scan.
    async fn scan_all(&self) -> Result<RecordScan, StoreError>;

    /// Rebuild every derived lookup structure from the current record set.
    async fn reindex(&self) -> Result<(), StoreError>;
}
