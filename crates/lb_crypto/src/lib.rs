//! lb_crypto — Lifeboat cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize all secret material on drop.
//! - Session key material is a value owned by one transfer session — it is
//!   never stored and never shared between sessions.
//!
//! # Module layout
//! - `handshake`  — one-shot ephemeral X25519 agreement + session key derivation
//! - `aead`       — XChaCha20-Poly1305 record encryption with explicit nonces
//! - `kdf`        — HKDF-SHA256 key derivation
//! - `credential` — Argon2id password hashing (PHC strings)
//! - `signing`    — Ed25519 token-issuer keys
//! - `error`      — unified error type

pub mod aead;
pub mod credential;
pub mod error;
pub mod handshake;
pub mod kdf;
pub mod signing;

pub use error::CryptoError;
pub use handshake::SessionKey;
