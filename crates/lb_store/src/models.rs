//! Database row models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use lb_proto::AccountRecord;

use crate::error::StoreError;

/// One row of the `accounts` table: the whole record as a JSON document.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub account_id: String,
    pub record: String,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    pub fn into_record(self) -> Result<AccountRecord, StoreError> {
        Ok(serde_json::from_str(&self.record)?)
    }
}
