//! Encrypted record envelope — what the transport sees during backup and
//! confidentiality-protected restore.
//!
//! One envelope per record: a fresh 24-byte nonce beside the ciphertext.
//! Envelopes are independent of each other; no cross-record chaining.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use lb_crypto::{aead, SessionKey};

use crate::{error::ProtoError, record::AccountRecord};

/// On-wire envelope: `{nonce, ciphertext}`, both base64url.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEnvelope {
    /// 24-byte XChaCha20-Poly1305 nonce, freshly random per envelope.
    pub nonce: String,
    /// Ciphertext + auth tag over the serialised whole record.
    pub ciphertext: String,
}

impl RecordEnvelope {
    pub fn nonce_bytes(&self) -> Result<[u8; aead::NONCE_LEN], ProtoError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(&self.nonce)
            .map_err(|e| ProtoError::InvalidEnvelope(format!("nonce: {e}")))?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| ProtoError::InvalidEnvelope(format!("nonce must be {} bytes", aead::NONCE_LEN)))
    }

    pub fn ciphertext_bytes(&self) -> Result<Vec<u8>, ProtoError> {
        URL_SAFE_NO_PAD
            .decode(&self.ciphertext)
            .map_err(|e| ProtoError::InvalidEnvelope(format!("ciphertext: {e}")))
    }
}

/// Serialise a whole record (public + private) and seal it for the wire.
pub fn seal_record(key: &SessionKey, record: &AccountRecord) -> Result<RecordEnvelope, ProtoError> {
    let plaintext = serde_json::to_vec(record)?;
    let (nonce, ciphertext) = aead::seal(key, &plaintext)?;
    Ok(RecordEnvelope {
        nonce: URL_SAFE_NO_PAD.encode(nonce),
        ciphertext: URL_SAFE_NO_PAD.encode(ciphertext),
    })
}

/// Open an envelope back into a record. Tampering, a wrong key, or a mangled
/// payload all fail here — the caller decides whether that is fatal.
pub fn open_record(key: &SessionKey, envelope: &RecordEnvelope) -> Result<AccountRecord, ProtoError> {
    let nonce = envelope.nonce_bytes()?;
    let ciphertext = envelope.ciphertext_bytes()?;
    let plaintext = aead::open(key, &nonce, &ciphertext)?;
    Ok(serde_json::from_slice(&plaintext)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PrivateProfile, PublicProfile};
    use chrono::Utc;
    use lb_crypto::handshake;
    use uuid::Uuid;

    fn key_pair() -> (SessionKey, SessionKey) {
        let caller = handshake::initiate();
        let (server, server_public) = handshake::respond(&caller.public_key()).unwrap();
        (server, caller.finish(&server_public).unwrap())
    }

    fn record() -> AccountRecord {
        AccountRecord {
            public: PublicProfile {
                account_id: Uuid::new_v4(),
                username: "ferris".into(),
                display_name: "Ferris".into(),
                identities: vec!["mastodon:@ferris".into()],
                roles: vec!["backup".into()],
            },
            private: PrivateProfile {
                emails: vec!["ferris@example.org".into()],
                password_phc: "$argon2id$stub".into(),
                created_at: Utc::now(),
                modified_at: Utc::now(),
            },
        }
    }

    #[test]
    fn seal_on_one_side_opens_on_the_other() {
        let (server_key, caller_key) = key_pair();
        let original = record();
        let envelope = seal_record(&server_key, &original).unwrap();
        let opened = open_record(&caller_key, &envelope).unwrap();
        assert_eq!(opened, original);
    }

    #[test]
    fn flipped_ciphertext_bit_is_detected() {
        let (server_key, caller_key) = key_pair();
        let mut envelope = seal_record(&server_key, &record()).unwrap();
        let mut raw = envelope.ciphertext_bytes().unwrap();
        raw[0] ^= 0x01;
        envelope.ciphertext = URL_SAFE_NO_PAD.encode(raw);
        assert!(open_record(&caller_key, &envelope).is_err());
    }

    #[test]
    fn truncated_nonce_is_rejected() {
        let (server_key, _) = key_pair();
        let mut envelope = seal_record(&server_key, &record()).unwrap();
        envelope.nonce = URL_SAFE_NO_PAD.encode([0u8; 12]);
        assert!(matches!(
            envelope.nonce_bytes(),
            Err(ProtoError::InvalidEnvelope(_))
        ));
    }
}
