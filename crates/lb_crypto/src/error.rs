use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("AEAD encryption failed")]
    AeadEncrypt,

    #[error("AEAD decryption failed (authentication tag mismatch — possible tampering)")]
    AeadDecrypt,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Key agreement produced a non-contributory shared secret")]
    DegenerateSharedSecret,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Signature verification failed")]
    SignatureVerification,

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
