//! One-shot session key negotiation.
//!
//! Protocol (per transfer session, before any record flows):
//!
//! ```text
//! Caller                              Server
//! ──────                              ──────
//! eph_pk_C  ─────────────────────────► respond(eph_pk_C):
//!                                        generate eph_sk_S / eph_pk_S
//!                                        shared = X25519(eph_sk_S, eph_pk_C)
//! eph_pk_S  ◄─────────────────────────   key = HKDF-SHA256(shared)
//!
//! caller: key = HKDF-SHA256(X25519(eph_sk_C, eph_pk_S))
//! ```
//!
//! Both key pairs are ephemeral and generated fresh for one session, so the
//! derived key is never a function of long-term secrets — compromise of one
//! session exposes nothing about any other (forward secrecy per session).
//! The ephemeral secrets are consumed by the DH computation and the shared
//! secret is dropped immediately after derivation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519Public};
use zeroize::ZeroizeOnDrop;

use crate::{error::CryptoError, kdf};

/// 32-byte symmetric key for one transfer session. Zeroized on drop,
/// never persisted, never cloned across sessions.
#[derive(ZeroizeOnDrop)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Decode a base64url 32-byte X25519 public key from the wire.
pub fn decode_public(b64: &str) -> Result<[u8; 32], CryptoError> {
    let bytes = URL_SAFE_NO_PAD.decode(b64)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidKey(format!("expected 32-byte public key, got {}", bytes.len())))
}

/// Encode an X25519 public key for the wire.
pub fn encode_public(public: &[u8; 32]) -> String {
    URL_SAFE_NO_PAD.encode(public)
}

/// Server side: answer a caller's ephemeral public key with a fresh ephemeral
/// pair of our own and derive the session key.
///
/// Returns the session key and our public key, which MUST be emitted to the
/// caller as the first response frame. The server's ephemeral secret is
/// consumed by the DH and cannot outlive this call.
pub fn respond(caller_public: &[u8; 32]) -> Result<(SessionKey, [u8; 32]), CryptoError> {
    let secret = EphemeralSecret::random_from_rng(OsRng);
    let public = X25519Public::from(&secret);

    let shared = secret.diffie_hellman(&X25519Public::from(*caller_public));
    if !shared.was_contributory() {
        return Err(CryptoError::DegenerateSharedSecret);
    }

    let key = kdf::derive_session_key(shared.as_bytes())?;
    Ok((SessionKey(key), *public.as_bytes()))
}

/// Caller side: the in-flight half of a handshake. Holds the ephemeral secret
/// until the server's public key arrives.
pub struct Initiation {
    secret: EphemeralSecret,
    public: [u8; 32],
}

/// Caller side: generate the ephemeral pair whose public half opens the session.
pub fn initiate() -> Initiation {
    let secret = EphemeralSecret::random_from_rng(OsRng);
    let public = *X25519Public::from(&secret).as_bytes();
    Initiation { secret, public }
}

impl Initiation {
    pub fn public_key(&self) -> [u8; 32] {
        self.public
    }

    pub fn public_key_b64(&self) -> String {
        encode_public(&self.public)
    }

    /// Complete the handshake with the server's ephemeral public key.
    pub fn finish(self, server_public: &[u8; 32]) -> Result<SessionKey, CryptoError> {
        let shared = self
            .secret
            .diffie_hellman(&X25519Public::from(*server_public));
        if !shared.was_contributory() {
            return Err(CryptoError::DegenerateSharedSecret);
        }
        let key = kdf::derive_session_key(shared.as_bytes())?;
        Ok(SessionKey(key))
    }
}
