//! Account records.
//!
//! A record is split into the *public projection* — safe to export in
//! cleartext — and the *private half*, which never crosses the service
//! boundary unencrypted. The transfer core treats records as opaque apart
//! from `public.account_id`; the split exists so the export stream can ship
//! `PublicProfile` values without ever touching private fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProtoError;

/// Cleartext-exportable half of an account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub account_id: Uuid,
    pub username: String,
    pub display_name: String,
    /// Linked external identities (federation handles, OIDC subjects, ...).
    #[serde(default)]
    pub identities: Vec<String>,
    /// Role tags consumed by the access gate ("backup", "admin", ...).
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Confidential half — credentials, emails, lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateProfile {
    #[serde(default)]
    pub emails: Vec<String>,
    /// Argon2id credential in PHC string format (salt embedded).
    pub password_phc: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A whole account record as stored and as carried (sealed) by backup/restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub public: PublicProfile,
    pub private: PrivateProfile,
}

impl AccountRecord {
    pub fn id(&self) -> Uuid {
        self.public.account_id
    }

    /// Structural validation applied when a record enters the system through
    /// registration. Restore deliberately does NOT validate — it rehydrates
    /// whatever the backup carried.
    pub fn validate(&self) -> Result<(), ProtoError> {
        if self.public.account_id.is_nil() {
            return Err(ProtoError::InvalidRecord("account id must not be nil".into()));
        }
        if !is_valid_username(&self.public.username) {
            return Err(ProtoError::InvalidRecord(
                "username must be 4-20 alphanumeric characters".into(),
            ));
        }
        if !is_valid_display_name(&self.public.display_name) {
            return Err(ProtoError::InvalidRecord(
                "display name must be 4-20 characters".into(),
            ));
        }
        Ok(())
    }
}

/// 4-20 ASCII alphanumeric characters, no whitespace.
pub fn is_valid_username(username: &str) -> bool {
    let username = username.trim();
    (4..=20).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric())
}

/// 4-20 characters after trimming.
pub fn is_valid_display_name(display_name: &str) -> bool {
    let display_name = display_name.trim();
    (4..=20).contains(&display_name.chars().count())
}
