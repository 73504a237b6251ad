//! Inputs of the order lifecycle operations.

use common::{Money, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};

use super::{CustomerInfo, Selections};

/// One raw line of a client cart, before normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_front_id: Option<i64>,
    /// Declared product type as typed by the client.
    pub product_type: Option<String>,
    pub product_name: String,
    pub base_price: Option<Money>,
    /// Caller-computed line total. Trusted as is when present.
    pub total_price: Option<Money>,
    /// Signed so that non-positive input can be rejected with its value.
    pub quantity: i64,
    pub description: Option<String>,
    pub selections: Option<Selections>,
}

impl CartLine {
    /// Creates a cart line with no prices, description or selections.
    pub fn new(product_type: impl Into<String>, product_name: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_front_id: None,
            product_type: Some(product_type.into()),
            product_name: product_name.into(),
            base_price: None,
            total_price: None,
            quantity,
            description: None,
            selections: None,
        }
    }

    pub fn with_front_id(mut self, id: i64) -> Self {
        self.product_front_id = Some(id);
        self
    }

    pub fn with_base_price(mut self, price: Money) -> Self {
        self.base_price = Some(price);
        self
    }

    pub fn with_total_price(mut self, total: Money) -> Self {
        self.total_price = Some(total);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_selections(mut self, selections: impl Into<Selections>) -> Self {
        self.selections = Some(selections.into());
        self
    }
}

/// Command to create an order from a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub customer: CustomerInfo,
    pub items: Vec<CartLine>,
}

impl CreateOrder {
    /// Creates a new CreateOrder command.
    pub fn new(customer: CustomerInfo, items: Vec<CartLine>) -> Self {
        Self { customer, items }
    }

    /// Creates an anonymous order.
    pub fn anonymous(items: Vec<CartLine>) -> Self {
        Self::new(CustomerInfo::default(), items)
    }
}

/// Command to overwrite the status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

impl UpdateStatus {
    /// Creates a new UpdateStatus command.
    pub fn new(order_id: OrderId, status: OrderStatus) -> Self {
        Self { order_id, status }
    }
}
