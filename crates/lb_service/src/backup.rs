//! Outbound streams: encrypted full backup and plaintext public export.

use tokio::sync::mpsc;
use tracing::debug;

use lb_crypto::handshake;
use lb_proto::{envelope, BackupFrame, CallerIdentity, PublicProfile, ROLE_ADMIN, ROLE_BACKUP};
use lb_store::RecordStore;

use crate::{error::TransferError, gate, TransferService};

impl<S: RecordStore> TransferService<S> {
    /// Stream every record — public and private halves — sealed under a
    /// freshly negotiated session key.
    ///
    /// Frame 1 is our ephemeral public key; frames 2..N are one envelope per
    /// record. An unauthorized caller gets a clean empty stream. A malformed
    /// caller key aborts before any record is read. Store errors mid-scan
    /// truncate the stream; the caller treats truncation as failure.
    pub async fn backup(
        &self,
        caller: &CallerIdentity,
        caller_public_key: &str,
        outbound: mpsc::Sender<BackupFrame>,
    ) -> Result<(), TransferError> {
        if !gate::authorize(caller, &[ROLE_BACKUP]) {
            return Ok(());
        }

        let caller_public = handshake::decode_public(caller_public_key)?;
        let (session_key, server_public) = handshake::respond(&caller_public)?;
        outbound
            .send(BackupFrame::ServerKey {
                public_key: handshake::encode_public(&server_public),
            })
            .await
            .map_err(|_| TransferError::StreamClosed)?;

        let mut scan = self.store.scan_all().await?;
        let mut sent = 0u64;
        while let Some(next) = scan.recv().await {
            let record = next?;
            let frame = BackupFrame::Record(envelope::seal_record(&session_key, &record)?);
            // Flow-controlled: suspends until the transport drains a slot.
            outbound.send(frame).await.map_err(|_| TransferError::StreamClosed)?;
            sent += 1;
        }

        debug!(records = sent, "backup stream complete");
        Ok(())
    }

    /// Stream the public projection of every record, unencrypted. No key
    /// negotiation; private fields are protected by never being sent.
    pub async fn export(
        &self,
        caller: &CallerIdentity,
        outbound: mpsc::Sender<PublicProfile>,
    ) -> Result<(), TransferError> {
        if !gate::authorize(caller, &[ROLE_BACKUP, ROLE_ADMIN]) {
            return Ok(());
        }

        let mut scan = self.store.scan_all().await?;
        let mut sent = 0u64;
        while let Some(next) = scan.recv().await {
            let record = next?;
            outbound
                .send(record.public)
                .await
                .map_err(|_| TransferError::StreamClosed)?;
            sent += 1;
        }

        debug!(records = sent, "export stream complete");
        Ok(())
    }
}
