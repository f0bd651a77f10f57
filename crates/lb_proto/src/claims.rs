//! Caller identity and role claims.
//!
//! The outer dispatch machinery resolves whatever credential arrived with a
//! request into a `CallerIdentity`; absent or invalid credentials resolve to
//! the anonymous identity (no roles), which every gate check then denies.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role required for backup and restore sessions.
pub const ROLE_BACKUP: &str = "backup";
/// Role that (alongside `backup`) may run plaintext exports.
pub const ROLE_ADMIN: &str = "admin";

/// The caller as seen by access-gated operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub account_id: Option<Uuid>,
    pub display_name: String,
    pub roles: HashSet<String>,
}

impl CallerIdentity {
    /// Identity of a caller with no usable credential. Holds no roles, so it
    /// fails every gate check.
    pub fn anonymous() -> Self {
        Self {
            account_id: None,
            display_name: String::new(),
            roles: HashSet::new(),
        }
    }

    pub fn has_any_role(&self, required: &[&str]) -> bool {
        required.iter().any(|role| self.roles.contains(*role))
    }
}

/// Signed payload of a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub display_name: String,
    pub roles: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn to_identity(&self) -> CallerIdentity {
        CallerIdentity {
            account_id: Some(self.sub),
            display_name: self.display_name.clone(),
            roles: self.roles.iter().cloned().collect(),
        }
    }
}
