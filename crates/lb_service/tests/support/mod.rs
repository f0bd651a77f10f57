//! Shared fixtures: an in-memory record store and canned identities.
//!
//! Compiled into each integration test binary; not every binary uses every
//! helper.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use lb_proto::{AccountRecord, CallerIdentity, PrivateProfile, PublicProfile, ROLE_ADMIN, ROLE_BACKUP};
use lb_store::{normalize_login, RecordScan, RecordStore, StoreError};

/// In-memory store. BTreeMap keeps scans in stable key order, like the
/// SQLite backend. Individual writes can be poisoned to exercise the
/// reconciler's failure isolation.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<Uuid, AccountRecord>>,
    reindexes: AtomicUsize,
    poisoned: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reindex_count(&self) -> usize {
        self.reindexes.load(Ordering::SeqCst)
    }

    /// Make every future write of `id` fail.
    pub fn poison_writes(&self, id: Uuid) {
        self.poisoned.lock().insert(id);
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.records.lock().keys().copied().collect()
    }

    pub fn snapshot(&self, id: Uuid) -> Option<AccountRecord> {
        self.records.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    fn checked_write(&self, record: &AccountRecord) -> Result<(), StoreError> {
        if self.poisoned.lock().contains(&record.id()) {
            return Err(StoreError::Backend("write poisoned by test".into()));
        }
        self.records.lock().insert(record.id(), record.clone());
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.records.lock().get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.records.lock().contains_key(&id))
    }

    async fn create(&self, record: &AccountRecord) -> Result<(), StoreError> {
        if self.records.lock().contains_key(&record.id()) {
            return Err(StoreError::Backend("duplicate id".into()));
        }
        self.checked_write(record)
    }

    async fn save(&self, record: &AccountRecord) -> Result<(), StoreError> {
        self.checked_write(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.records.lock().remove(&id);
        Ok(())
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<AccountRecord>, StoreError> {
        let wanted = normalize_login(login);
        Ok(self
            .records
            .lock()
            .values()
            .find(|r| {
                normalize_login(&r.public.username) == wanted
                    || r.private.emails.iter().any(|e| normalize_login(e) == wanted)
            })
            .cloned())
    }

    async fn scan_all(&self) -> Result<RecordScan, StoreError> {
        let snapshot: Vec<AccountRecord> = self.records.lock().values().cloned().collect();
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            for record in snapshot {
                if tx.send(Ok(record)).await.is_err() {
                    return;
                }
            }
        });
        Ok(rx)
    }

    async fn reindex(&self) -> Result<(), StoreError> {
        self.reindexes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn record(username: &str) -> AccountRecord {
    AccountRecord {
        public: PublicProfile {
            account_id: Uuid::new_v4(),
            username: username.into(),
            display_name: format!("{username} display"),
            identities: vec![],
            roles: vec![],
        },
        private: PrivateProfile {
            emails: vec![format!("{username}@example.org")],
            password_phc: "$argon2id$stub".into(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
        },
    }
}

pub fn backup_caller() -> CallerIdentity {
    let mut caller = CallerIdentity::anonymous();
    caller.display_name = "backup-operator".into();
    caller.roles.insert(ROLE_BACKUP.into());
    caller
}

pub fn admin_caller() -> CallerIdentity {
    let mut caller = CallerIdentity::anonymous();
    caller.display_name = "admin".into();
    caller.roles.insert(ROLE_ADMIN.into());
    caller
}
