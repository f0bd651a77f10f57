//! Credential hashing and bearer tokens — the simple companion service the
//! transfer gate leans on.
//!
//! Tokens are `base64url(claims JSON) . base64url(Ed25519 signature)`,
//! signed with the service's issuer key. Verification failures of any kind
//! — bad shape, bad signature, expired — resolve to the anonymous identity
//! rather than an error, so downstream gate checks fail closed without
//! telling the caller why.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use lb_crypto::{credential, signing::IssuerKey};
use lb_proto::{AccountRecord, CallerIdentity, TokenClaims};
use lb_store::RecordStore;

use crate::{config::ServiceConfig, error::TransferError};

pub struct AuthService<S> {
    store: Arc<S>,
    issuer: IssuerKey,
    token_ttl: Duration,
}

impl<S: RecordStore> AuthService<S> {
    pub fn new(store: Arc<S>, issuer: IssuerKey, config: &ServiceConfig) -> Self {
        Self {
            store,
            issuer,
            token_ttl: Duration::days(config.token_ttl_days),
        }
    }

    /// Sign a bearer token carrying the record's identity and role claims.
    pub fn issue_token(&self, record: &AccountRecord) -> Result<String, TransferError> {
        let claims = TokenClaims {
            sub: record.id(),
            display_name: record.public.display_name.clone(),
            roles: record.public.roles.clone(),
            expires_at: Utc::now() + self.token_ttl,
        };
        let payload = serde_json::to_vec(&claims).map_err(lb_proto::ProtoError::from)?;
        let signature = self.issuer.sign(&payload);
        Ok(format!("{}.{}", URL_SAFE_NO_PAD.encode(payload), signature))
    }

    /// Resolve a bearer token into a caller identity. Anything short of a
    /// valid, unexpired, correctly signed token yields the anonymous
    /// identity (no roles).
    pub fn verify_token(&self, token: &str) -> CallerIdentity {
        match self.parse_token(token) {
            Some(identity) => identity,
            None => {
                debug!("token rejected, treating caller as anonymous");
                CallerIdentity::anonymous()
            }
        }
    }

    fn parse_token(&self, token: &str) -> Option<CallerIdentity> {
        let (payload_b64, signature) = token.split_once('.')?;
        let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        self.issuer.verify(&payload, signature).ok()?;
        let claims: TokenClaims = serde_json::from_slice(&payload).ok()?;
        if claims.is_expired(Utc::now()) {
            return None;
        }
        Some(claims.to_identity())
    }

    /// Check a login/password pair and issue a token on success. Unknown
    /// login and wrong password are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> Result<Option<String>, TransferError> {
        if login.trim().is_empty() || password.is_empty() {
            return Ok(None);
        }
        let Some(record) = self.store.get_by_login(login).await? else {
            return Ok(None);
        };
        if !credential::verify_password(password, &record.private.password_phc) {
            return Ok(None);
        }
        Ok(Some(self.issue_token(&record)?))
    }

    /// Create a new account: validate, hash the password, stamp lifecycle
    /// timestamps, store, and log the caller straight in.
    pub async fn register(
        &self,
        mut record: AccountRecord,
        password: &str,
    ) -> Result<String, TransferError> {
        record.validate()?;
        if self
            .store
            .get_by_login(&record.public.username)
            .await?
            .is_some()
        {
            return Err(TransferError::LoginTaken);
        }

        let now = Utc::now();
        record.private.created_at = now;
        record.private.modified_at = now;
        record.private.password_phc = credential::hash_password(password)
            .map_err(lb_proto::ProtoError::from)?;

        self.store.create(&record).await?;
        self.issue_token(&record)
    }

    /// Rotate a password after re-checking the old one. Returns false when
    /// the account is unknown or the old password does not verify.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, TransferError> {
        let Some(mut record) = self.store.get(account_id).await? else {
            return Ok(false);
        };
        if !credential::verify_password(old_password, &record.private.password_phc) {
            return Ok(false);
        }
        record.private.password_phc = credential::hash_password(new_password)
            .map_err(lb_proto::ProtoError::from)?;
        record.private.modified_at = Utc::now();
        self.store.save(&record).await?;
        Ok(true)
    }
}
