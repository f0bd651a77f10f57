use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Handshake failed: {0}")]
    Handshake(#[from] lb_crypto::CryptoError),

    #[error("Protocol error: {0}")]
    Proto(#[from] lb_proto::ProtoError),

    #[error("Store error: {0}")]
    Store(#[from] lb_store::StoreError),

    #[error("Transport stream closed by peer")]
    StreamClosed,

    #[error("Operation not permitted")]
    Denied,

    #[error("Login already taken")]
    LoginTaken,
}
