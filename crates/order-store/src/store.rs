use async_trait::async_trait;

use crate::{Condition, OrderId, OrderRecord, OrderWrite, Page, PageRequest, Result, StoreError};

/// Entry point to a backend: hands out one transaction per unit of work.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// The transaction type of this backend.
    type Transaction: OrderTransaction;

    /// Opens a new transaction.
    async fn begin(&self) -> Result<Self::Transaction>;
}

/// A single all-or-nothing unit of work against the store.
///
/// Nothing written through a transaction is visible to others until
/// [`commit`](OrderTransaction::commit) returns. Dropping a transaction
/// without committing rolls it back.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Applies a write and returns the stored aggregate.
    ///
    /// An insert stores the order and every line item, assigning IDs.
    /// A status update fails with `OrderNotFound` if the order is missing
    /// and never touches line items.
    async fn save(&mut self, write: OrderWrite) -> Result<OrderRecord>;

    /// Loads an order with all of its line items.
    async fn get_by_id(&mut self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// Returns the orders matching `condition`, each at most once.
    async fn find_page(
        &mut self,
        condition: &Condition,
        page: &PageRequest,
    ) -> Result<Page<OrderRecord>>;

    /// Makes every write of this transaction durable.
    async fn commit(self) -> Result<()>;

    /// Discards every write of this transaction.
    async fn rollback(self) -> Result<()>;
}

/// Extension trait providing convenience methods for transactions.
#[async_trait]
pub trait OrderTransactionExt: OrderTransaction {
    /// Loads an order, failing with `OrderNotFound` if it does not exist.
    async fn get_required(&mut self, id: OrderId) -> Result<OrderRecord> {
        self.get_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound(id))
    }
}

// Blanket implementation for all OrderTransaction implementations
impl<T: OrderTransaction + ?Sized> OrderTransactionExt for T {}
