//! Domain error types.

use common::OrderId;
use order_store::StoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The input was rejected by a business rule.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// No order with this ID exists.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// An error occurred in the order store.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::OrderNotFound(id) => DomainError::OrderNotFound(id),
            other => DomainError::Store(other),
        }
    }
}
