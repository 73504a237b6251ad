//! Order lifecycle service.

use order_store::{
    OrderStore, OrderTransaction, OrderTransactionExt, OrderWrite, Page, PageRequest,
};

use super::{
    CreateOrder, Order, OrderDetails, OrderFilters, OrderListItem, OrderSummary, UpdateStatus,
    normalize_line,
};
use crate::error::DomainError;
use common::OrderId;

/// Service for managing orders.
///
/// Every operation runs in exactly one store transaction. The transaction
/// is committed when the operation succeeds; on any error it is dropped,
/// which rolls it back.
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Prices a cart and stores it as a new order.
    ///
    /// Every line is normalised before anything is written, so a rejected
    /// line leaves the store untouched.
    #[tracing::instrument(skip_all, fields(items = cmd.items.len()))]
    pub async fn create(&self, cmd: CreateOrder) -> Result<OrderSummary, DomainError> {
        let items = cmd
            .items
            .into_iter()
            .map(normalize_line)
            .collect::<Result<Vec<_>, _>>()?;
        let order = Order::build(cmd.customer, items)?;

        let mut tx = self.store.begin().await?;
        let saved = tx.save(OrderWrite::Insert(order.into())).await?;
        tx.commit().await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(
            order_id = %saved.id,
            total_amount = %saved.total_amount,
            item_count = saved.item_count(),
            "Order created"
        );

        Ok(OrderSummary::from(&saved))
    }

    /// Loads an order with all of its line items.
    #[tracing::instrument(skip(self))]
    pub async fn get_details(&self, id: OrderId) -> Result<OrderDetails, DomainError> {
        let mut tx = self.store.begin().await?;
        let order = tx.get_required(id).await?;
        tx.commit().await?;

        Ok(OrderDetails::from(order))
    }

    /// Lists the orders matching every present filter.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        filters: &OrderFilters,
        page: &PageRequest,
    ) -> Result<Page<OrderListItem>, DomainError> {
        let condition = filters.to_condition();

        let mut tx = self.store.begin().await?;
        let orders = tx.find_page(&condition, page).await?;
        tx.commit().await?;

        metrics::counter!("order_list_queries_total").increment(1);
        tracing::debug!(
            total_elements = orders.total_elements,
            joined = condition.requires_item_join(),
            "Orders listed"
        );

        Ok(orders.map(OrderListItem::from))
    }

    /// Overwrites the status of an order.
    ///
    /// Any status may follow any other. Concurrent updates to the same order
    /// resolve as last writer wins.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, cmd: UpdateStatus) -> Result<OrderSummary, DomainError> {
        let mut tx = self.store.begin().await?;
        let current = tx.get_required(cmd.order_id).await?;

        if current.status.is_terminal() && current.status != cmd.status {
            tracing::warn!(
                order_id = %cmd.order_id,
                from = current.status.as_str(),
                to = cmd.status.as_str(),
                "Reopening an order in a terminal status"
            );
        }

        let saved = tx
            .save(OrderWrite::UpdateStatus {
                id: cmd.order_id,
                status: cmd.status,
            })
            .await?;
        tx.commit().await?;

        metrics::counter!("order_status_updates_total", "status" => cmd.status.as_str())
            .increment(1);

        Ok(OrderSummary::from(&saved))
    }
}
