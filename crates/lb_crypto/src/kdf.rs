//! Key derivation functions
//!
//! `hkdf_expand` — HKDF-SHA256, the single derivation step between a raw
//! X25519 shared secret and a usable session key.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::CryptoError;

/// Domain separator mixed into every session key derivation.
const HANDSHAKE_SALT: &[u8] = b"lb-handshake-v1";

/// Expand `ikm` + `info` into `output.len()` bytes of key material.
///
/// `salt` may be empty (HKDF will use a zeroed salt).
pub fn hkdf_expand(
    ikm: &[u8],
    salt: Option<&[u8]>,
    info: &[u8],
    output: &mut [u8],
) -> Result<(), CryptoError> {
    let hk = Hkdf::<Sha256>::new(salt, ikm);
    hk.expand(info, output)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))
}

/// Derive the 32-byte per-session symmetric key from an ECDH shared secret.
/// Both sides of the handshake call this with the same inputs.
pub fn derive_session_key(shared_secret: &[u8]) -> Result<[u8; 32], CryptoError> {
    let mut key = [0u8; 32];
    hkdf_expand(shared_secret, Some(HANDSHAKE_SALT), b"session-key", &mut key)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_same_key() {
        let a = derive_session_key(&[7u8; 32]).unwrap();
        let b = derive_session_key(&[7u8; 32]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_secret_different_key() {
        let a = derive_session_key(&[7u8; 32]).unwrap();
        let b = derive_session_key(&[8u8; 32]).unwrap();
        assert_ne!(a, b);
    }
}
