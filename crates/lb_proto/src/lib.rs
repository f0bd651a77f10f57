//! lb_proto — Wire types and serialisation for the Lifeboat transfer channel
//!
//! All on-wire types are serialised to JSON and binary fields travel as
//! base64url strings, so any ordered, reliable, bidirectional message stream
//! can carry them without caring about the payload shape.
//!
//! # Modules
//! - `record`   — account records: public projection + private half, validation
//! - `envelope` — encrypted record envelope (nonce + ciphertext) and seal/open
//! - `transfer` — backup/restore stream frames, restore modes, the report
//! - `claims`   — caller identity, role constants, token claims
//! - `error`    — unified error type

pub mod claims;
pub mod envelope;
pub mod error;
pub mod record;
pub mod transfer;

pub use claims::{CallerIdentity, TokenClaims, ROLE_ADMIN, ROLE_BACKUP};
pub use envelope::RecordEnvelope;
pub use error::ProtoError;
pub use record::{AccountRecord, PrivateProfile, PublicProfile};
pub use transfer::{BackupFrame, RestoreFrame, RestoreMode, RestoreReport};
