//! Restore reconciliation — the inbound half of disaster recovery.
//!
//! The session is a small state machine. The first frame must be a directive
//! carrying the mode; anything else aborts with the zero report. Each record
//! frame is then reconciled against the store: absent ids are created,
//! present ids are skipped or overwritten per mode. Wipe mode finishes with
//! a sweep that deletes every stored record the stream did not mention, and
//! every completed session ends by reindexing the store.
//!
//! A failed record — bad envelope, store write refused — is dropped, logged,
//! and counted in `failed`; the session always continues. Maximal forward
//! progress on a bulk recovery beats strict failure propagation here: the
//! operator reads the report, not half a store.

use std::collections::HashSet;

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use lb_crypto::{handshake, SessionKey};
use lb_proto::{envelope, AccountRecord, CallerIdentity, RestoreFrame, RestoreMode, RestoreReport, ROLE_BACKUP};
use lb_store::RecordStore;

use crate::{error::TransferError, gate, TransferService};

/// Result of the optional pre-restore key negotiation. The session key is
/// handed to [`TransferService::restore`] when the inbound stream carries
/// sealed records; the public key goes back to the caller.
pub struct RestoreHandshake {
    pub session_key: SessionKey,
    pub server_public_key: String,
}

impl<S: RecordStore> TransferService<S> {
    /// Negotiate a session key for a confidentiality-protected restore.
    ///
    /// The restore stream itself has a single response slot (the report at
    /// stream end), so the server key cannot travel in-band the way it does
    /// for backup; the dispatcher runs this exchange first and passes the
    /// key into [`restore`](Self::restore).
    pub fn restore_handshake(
        &self,
        caller: &CallerIdentity,
        caller_public_key: &str,
    ) -> Result<RestoreHandshake, TransferError> {
        if !gate::authorize(caller, &[ROLE_BACKUP]) {
            return Err(TransferError::Denied);
        }
        let caller_public = handshake::decode_public(caller_public_key)?;
        let (session_key, server_public) = handshake::respond(&caller_public)?;
        Ok(RestoreHandshake {
            session_key,
            server_public_key: handshake::encode_public(&server_public),
        })
    }

    /// Consume a restore stream and reconcile it into the store.
    ///
    /// Always returns a report — the zero report when the session aborted
    /// before ingesting (missing directive, unauthorized caller).
    pub async fn restore(
        &self,
        caller: &CallerIdentity,
        session_key: Option<SessionKey>,
        mut inbound: mpsc::Receiver<RestoreFrame>,
    ) -> RestoreReport {
        info!("restore session opened");
        let mut report = RestoreReport::default();

        let mode = match inbound.recv().await {
            Some(RestoreFrame::Directive { mode }) => mode,
            Some(_) => {
                warn!("restore stream began with a record frame, aborting");
                return report;
            }
            None => {
                warn!("restore stream ended before a directive arrived");
                return report;
            }
        };

        if !gate::authorize(caller, &[ROLE_BACKUP]) {
            warn!("restore denied, returning empty report");
            return report;
        }

        let mut visited: HashSet<Uuid> = HashSet::new();
        while let Some(frame) = inbound.recv().await {
            let record = match frame {
                RestoreFrame::Record(record) => record,
                RestoreFrame::Sealed(sealed) => match session_key.as_ref() {
                    Some(key) => match envelope::open_record(key, &sealed) {
                        Ok(record) => record,
                        Err(e) => {
                            warn!(error = %e, "dropping record: envelope rejected");
                            report.failed += 1;
                            continue;
                        }
                    },
                    None => {
                        warn!("dropping sealed record: no session key was negotiated");
                        report.failed += 1;
                        continue;
                    }
                },
                RestoreFrame::Directive { .. } => {
                    warn!("dropping stray directive frame mid-stream");
                    report.failed += 1;
                    continue;
                }
            };

            // Mark the id as seen even if the write below fails: a record the
            // stream mentioned must never be wiped by the sweep.
            let id = record.id();
            visited.insert(id);

            if let Err(e) = self.apply_record(mode, record, &mut report).await {
                warn!(account = %id, error = %e, "dropping record: reconciliation failed");
                report.failed += 1;
            }
        }

        if mode == RestoreMode::Wipe {
            if let Err(e) = self.wipe_unvisited(&visited, &mut report).await {
                warn!(error = %e, "wipe sweep aborted");
            }
        }

        info!("restore finalizing, reindexing store");
        if let Err(e) = self.store.reindex().await {
            warn!(error = %e, "reindex after restore failed");
        }

        info!(
            restored = report.restored,
            overwritten = report.overwritten,
            skipped = report.skipped,
            wiped = report.wiped,
            failed = report.failed,
            "restore session closed"
        );
        report
    }

    async fn apply_record(
        &self,
        mode: RestoreMode,
        record: AccountRecord,
        report: &mut RestoreReport,
    ) -> Result<(), TransferError> {
        if self.store.exists(record.id()).await? {
            if mode == RestoreMode::MissingOnly {
                report.skipped += 1;
                return Ok(());
            }
            self.store.save(&record).await?;
            report.overwritten += 1;
        } else {
            self.store.create(&record).await?;
            report.restored += 1;
        }
        Ok(())
    }

    /// Wipe-mode sweep: delete every stored record whose id the inbound
    /// stream never mentioned. The only place restore touches records that
    /// were not in the stream.
    async fn wipe_unvisited(
        &self,
        visited: &HashSet<Uuid>,
        report: &mut RestoreReport,
    ) -> Result<(), TransferError> {
        let mut scan = self.store.scan_all().await?;
        while let Some(next) = scan.recv().await {
            let record = next?;
            let id = record.id();
            if !visited.contains(&id) {
                self.store.delete(id).await?;
                report.wiped += 1;
            }
        }
        Ok(())
    }
}
