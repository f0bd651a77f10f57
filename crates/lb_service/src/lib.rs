//! lb_service — Lifeboat transfer sessions
//!
//! One [`TransferService`] instance serves many concurrent sessions against
//! one record store. Each session (backup, export, or restore) is a single
//! sequential unit of work: channel sends/receives and awaited store calls
//! are its only suspension points, so side effects and report counters stay
//! strictly ordered within a session. Session-scoped state — the negotiated
//! key, the visited-id set — lives in the session call's own stack, never on
//! the service.
//!
//! The outer request-dispatch machinery is not built here: it resolves a
//! credential into a `CallerIdentity` (see [`auth`]), builds channel pairs
//! (see the `*_channel` helpers), hands this service one end, and wires the
//! other end to its transport.
//!
//! # Modules
//! - `gate`    — role checks in front of every transfer operation
//! - `backup`  — encrypted full backup + plaintext public export streams
//! - `restore` — the reconciliation state machine (create/overwrite/skip/wipe)
//! - `auth`    — credential hashing, bearer tokens, caller identity
//! - `config`  — tunables
//! - `error`   — unified error type

pub mod auth;
pub mod backup;
pub mod config;
pub mod error;
pub mod gate;
pub mod restore;

use std::sync::Arc;

use tokio::sync::mpsc;

use lb_proto::{BackupFrame, PublicProfile, RestoreFrame};
use lb_store::RecordStore;

pub use config::ServiceConfig;
pub use error::TransferError;
pub use restore::RestoreHandshake;

/// Entry point for transfer sessions against one record store.
pub struct TransferService<S> {
    pub(crate) store: Arc<S>,
    pub(crate) config: ServiceConfig,
}

// Hand-rolled: a derive would demand S: Clone, but the store is shared.
impl<S> Clone for TransferService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: RecordStore> TransferService<S> {
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Bounded frame channel for one backup session. The dispatcher keeps the
    /// receiver; the bound is what turns a slow consumer into producer-side
    /// suspension instead of unbounded buffering.
    pub fn backup_channel(&self) -> (mpsc::Sender<BackupFrame>, mpsc::Receiver<BackupFrame>) {
        mpsc::channel(self.config.stream_queue_depth)
    }

    pub fn export_channel(&self) -> (mpsc::Sender<PublicProfile>, mpsc::Receiver<PublicProfile>) {
        mpsc::channel(self.config.stream_queue_depth)
    }

    pub fn restore_channel(&self) -> (mpsc::Sender<RestoreFrame>, mpsc::Receiver<RestoreFrame>) {
        mpsc::channel(self.config.stream_queue_depth)
    }
}
