use thiserror::Error;

use crate::OrderId;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order exists with this ID.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A persisted value could not be read back (unknown enum name,
    /// out-of-range quantity).
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
