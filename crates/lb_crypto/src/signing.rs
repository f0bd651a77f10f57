//! Ed25519 issuer keys for bearer tokens.
//!
//! The token service signs a claims payload with the service's long-term
//! Ed25519 key; verification happens against the same key (single issuer).
//! Token *format* is owned by the service layer — this module only signs
//! and verifies raw payload bytes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::error::CryptoError;

/// Long-term signing key for a token issuer.
pub struct IssuerKey {
    signing: SigningKey,
    verifying: VerifyingKey,
}

impl IssuerKey {
    /// Generate a fresh issuer key. Real deployments load this from the
    /// service key store; tests and first-run paths generate one.
    pub fn generate() -> Self {
        let signing = SigningKey::generate(&mut OsRng);
        let verifying = signing.verifying_key();
        Self { signing, verifying }
    }

    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        let signing = SigningKey::from_bytes(secret);
        let verifying = signing.verifying_key();
        Self { signing, verifying }
    }

    /// Base64url public half, for out-of-band distribution.
    pub fn public_key_b64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.verifying.as_bytes())
    }

    /// Sign a payload; returns the base64url signature.
    pub fn sign(&self, payload: &[u8]) -> String {
        let sig = self.signing.sign(payload);
        URL_SAFE_NO_PAD.encode(sig.to_bytes())
    }

    /// Verify a base64url signature over a payload.
    pub fn verify(&self, payload: &[u8], sig_b64: &str) -> Result<(), CryptoError> {
        let sig_bytes = URL_SAFE_NO_PAD.decode(sig_b64)?;
        let sig = Signature::from_bytes(
            sig_bytes
                .as_slice()
                .try_into()
                .map_err(|_| CryptoError::InvalidKey("signature must be 64 bytes".into()))?,
        );
        self.verifying
            .verify(payload, &sig)
            .map_err(|_| CryptoError::SignatureVerification)
    }
}
