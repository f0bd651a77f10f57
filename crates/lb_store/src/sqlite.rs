//! SQLite implementation of [`RecordStore`] via sqlx.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use lb_proto::AccountRecord;

use crate::{
    error::StoreError,
    models::AccountRow,
    records::{normalize_login, RecordScan, RecordStore},
};

/// Rows fetched per page while scanning or reindexing.
const SCAN_BATCH: i64 = 256;
/// In-flight records a scan may hold before the producer suspends.
const SCAN_QUEUE_DEPTH: usize = 32;

const SELECT_PAGE: &str =
    "SELECT account_id, record, updated_at FROM accounts WHERE account_id > ? ORDER BY account_id LIMIT ?";

/// Store handle.  Cheap to clone (pool is Arc internally).
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `db_path` and run pending
    /// migrations.
    ///
    /// WAL journal mode and foreign-key enforcement are configured at
    /// connection time, not inside a migration — SQLite forbids changing
    /// `journal_mode` inside a transaction and sqlx wraps every migration
    /// in one.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Normalised login handles one record contributes to the index.
    fn index_rows(record: &AccountRecord) -> Vec<String> {
        let mut logins = vec![normalize_login(&record.public.username)];
        for email in &record.private.emails {
            let email = normalize_login(email);
            if !email.is_empty() && !logins.contains(&email) {
                logins.push(email);
            }
        }
        logins
    }

    async fn write_record(&self, record: &AccountRecord, replace: bool) -> Result<(), StoreError> {
        let id = record.id().to_string();
        let json = serde_json::to_string(record)?;

        let mut tx = self.pool.begin().await?;
        let insert = if replace {
            "INSERT OR REPLACE INTO accounts (account_id, record, updated_at) VALUES (?, ?, ?)"
        } else {
            "INSERT INTO accounts (account_id, record, updated_at) VALUES (?, ?, ?)"
        };
        sqlx::query(insert)
            .bind(&id)
            .bind(&json)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM login_index WHERE account_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        for login in Self::index_rows(record) {
            sqlx::query("INSERT OR REPLACE INTO login_index (login, account_id) VALUES (?, ?)")
                .bind(&login)
                .bind(&id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_by_id_string(&self, id: &str) -> Result<Option<AccountRecord>, StoreError> {
        let row: Option<AccountRow> =
            sqlx::query_as("SELECT account_id, record, updated_at FROM accounts WHERE account_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(AccountRow::into_record).transpose()
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, id: Uuid) -> Result<Option<AccountRecord>, StoreError> {
        self.get_by_id_string(&id.to_string()).await
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE account_id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, record: &AccountRecord) -> Result<(), StoreError> {
        self.write_record(record, false).await
    }

    async fn save(&self, record: &AccountRecord) -> Result<(), StoreError> {
        self.write_record(record, true).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let id = id.to_string();
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM login_index WHERE account_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM accounts WHERE account_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<AccountRecord>, StoreError> {
        let id: Option<String> = sqlx::query_scalar("SELECT account_id FROM login_index WHERE login = ?")
            .bind(normalize_login(login))
            .fetch_optional(&self.pool)
            .await?;
        match id {
            Some(id) => self.get_by_id_string(&id).await,
            None => Ok(None),
        }
    }

    async fn scan_all(&self) -> Result<RecordScan, StoreError> {
        let (tx, rx) = mpsc::channel(SCAN_QUEUE_DEPTH);
        let pool = self.pool.clone();

        tokio::spawn(async move {
            let mut last = String::new();
            loop {
                let rows: Vec<AccountRow> = match sqlx::query_as(SELECT_PAGE)
                    .bind(&last)
                    .bind(SCAN_BATCH)
                    .fetch_all(&pool)
                    .await
                {
                    Ok(rows) => rows,
                    Err(e) => {
                        let _ = tx.send(Err(StoreError::Database(e))).await;
                        return;
                    }
                };
                if rows.is_empty() {
                    return;
                }
                for row in rows {
                    last.clone_from(&row.account_id);
                    let item = row.into_record();
                    let corrupt = item.is_err();
                    if tx.send(item).await.is_err() || corrupt {
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn reindex(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM login_index").execute(&mut *tx).await?;

        let mut indexed = 0usize;
        let mut last = String::new();
        loop {
            let rows: Vec<AccountRow> = sqlx::query_as(SELECT_PAGE)
                .bind(&last)
                .bind(SCAN_BATCH)
                .fetch_all(&mut *tx)
                .await?;
            if rows.is_empty() {
                break;
            }
            for row in rows {
                last.clone_from(&row.account_id);
                let record = row.into_record()?;
                for login in Self::index_rows(&record) {
                    sqlx::query("INSERT OR REPLACE INTO login_index (login, account_id) VALUES (?, ?)")
                        .bind(&login)
                        .bind(&last)
                        .execute(&mut *tx)
                        .await?;
                }
                indexed += 1;
            }
        }

        tx.commit().await?;
        info!(records = indexed, "login index rebuilt");
        Ok(())
    }
}
