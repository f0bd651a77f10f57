//! Transfer stream frames.
//!
//! Backup (server → caller): frame 1 is the server's ephemeral public key,
//! frames 2..N are one envelope per record, and the stream's natural end is
//! the only trailer. Export streams are bare `PublicProfile` values and need
//! no frame enum.
//!
//! Restore (caller → server): frame 1 must be the directive carrying the
//! mode; frames 2..N carry one record each, either plain or sealed. The
//! single response is the report at stream end.

use serde::{Deserialize, Serialize};

use crate::envelope::RecordEnvelope;
use crate::record::AccountRecord;

/// Outbound backup stream frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackupFrame {
    /// Server's ephemeral X25519 public key (base64url), always first.
    ServerKey { public_key: String },
    /// One sealed record.
    Record(RecordEnvelope),
}

/// How the reconciler treats records that already exist in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    /// Only write records whose identifier is absent; skip the rest.
    MissingOnly,
    /// Write every inbound record, replacing existing ones.
    Overwrite,
    /// Like Overwrite, then delete every stored record the stream did not
    /// mention — the store ends exactly equal to the restored set.
    Wipe,
}

/// Inbound restore stream frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RestoreFrame {
    /// Must be the first frame of the stream.
    Directive { mode: RestoreMode },
    /// A record in cleartext (trusted transport).
    Record(AccountRecord),
    /// A record sealed under the negotiated session key.
    Sealed(RecordEnvelope),
}

/// Counters accumulated over one restore session, returned once at stream
/// end — including the all-zero case when the session aborted early.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreReport {
    pub restored: u64,
    pub overwritten: u64,
    pub skipped: u64,
    pub wiped: u64,
    /// Records dropped by per-record failure isolation. Processing always
    /// continues past a failed record; this counter is how the caller finds
    /// out it happened.
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_wire_shape() {
        let json = serde_json::to_value(RestoreFrame::Directive { mode: RestoreMode::Wipe }).unwrap();
        assert_eq!(json["type"], "directive");
        assert_eq!(json["mode"], "wipe");
    }

    #[test]
    fn server_key_is_distinguishable_from_records() {
        let frame = BackupFrame::ServerKey { public_key: "AAAA".into() };
        let round: BackupFrame = serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();
        assert!(matches!(round, BackupFrame::ServerKey { .. }));
    }

    #[test]
    fn report_defaults_to_zero() {
        let report = RestoreReport::default();
        assert_eq!(
            (report.restored, report.overwritten, report.skipped, report.wiped, report.failed),
            (0, 0, 0, 0, 0)
        );
    }
}
