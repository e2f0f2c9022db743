//! Error types for the persistence layer.

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A serialization or deserialization error on a JSON column.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted row failed to map back onto the domain model.
    #[error("corrupt row: {context}")]
    Corrupt {
        /// What was wrong with the row.
        context: String,
    },
}
