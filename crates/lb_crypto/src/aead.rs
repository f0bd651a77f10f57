//! Authenticated Encryption with Associated Data
//!
//! Uses XChaCha20-Poly1305 (192-bit nonce).
//! Key size: 32 bytes.  Nonce: 24 bytes (random).  Tag: 16 bytes.
//!
//! Unlike a stream cipher chain, every record is sealed independently under a
//! fresh random nonce, so records can be processed one at a time with no
//! cross-record state. Replay of an old envelope within a session is NOT
//! detected at this layer — sequencing is the transport session's concern.

use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::handshake::SessionKey;

/// XChaCha20-Poly1305 nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Associated data binding ciphertexts to the record transfer protocol.
const RECORD_AAD: &[u8] = b"lb-record-v1";

/// Seal `plaintext` under the session key with a fresh random nonce.
/// The nonce travels beside the ciphertext in the envelope, not inside it.
pub fn seal(key: &SessionKey, plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>), CryptoError> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| CryptoError::AeadEncrypt)?;

    let nonce = XChaCha20Poly1305::generate_nonce(&mut AeadOsRng);

    let ciphertext = cipher
        .encrypt(&nonce, chacha20poly1305::aead::Payload { msg: plaintext, aad: RECORD_AAD })
        .map_err(|_| CryptoError::AeadEncrypt)?;

    let mut nonce_out = [0u8; NONCE_LEN];
    nonce_out.copy_from_slice(&nonce);
    Ok((nonce_out, ciphertext))
}

/// Open a sealed record. Fails with `AeadDecrypt` on tampering or wrong key —
/// never "decrypts to garbage".
pub fn open(
    key: &SessionKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| CryptoError::AeadDecrypt)?;

    let plaintext = cipher
        .decrypt(
            XNonce::from_slice(nonce),
            chacha20poly1305::aead::Payload { msg: ciphertext, aad: RECORD_AAD },
        )
        .map_err(|_| CryptoError::AeadDecrypt)?;

    Ok(Zeroizing::new(plaintext))
}
