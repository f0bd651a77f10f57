use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] lb_crypto::CryptoError),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
