use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    /// Escape hatch for non-SQLite `RecordStore` implementations.
    #[error("Storage backend error: {0}")]
    Backend(String),
}
