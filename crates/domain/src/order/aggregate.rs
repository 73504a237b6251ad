//! Order aggregate construction.

use chrono::{DateTime, SubsecRound, Utc};
use common::{Money, OrderStatus, ProductCategory};
use order_store::{NewLineItem, NewOrder};

use super::{CustomerInfo, OrderError};

/// A normalised, priced line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_front_id: Option<i64>,
    pub category: ProductCategory,
    pub product_name: String,
    pub base_price: Money,
    pub line_total: Money,
    pub quantity: u32,
    /// Encoded selection document.
    pub selections: Option<String>,
    pub description: Option<String>,
}

/// A new order, ready to be stored.
///
/// The total is derived from the line items once, at construction, and is
/// never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    created_at: DateTime<Utc>,
    status: OrderStatus,
    total_amount: Money,
    customer: CustomerInfo,
    items: Vec<LineItem>,
}

impl Order {
    /// Builds an order stamped with the current time.
    pub fn build(customer: CustomerInfo, items: Vec<LineItem>) -> Result<Self, OrderError> {
        Self::build_at(customer, items, Utc::now())
    }

    /// Builds an order with an explicit creation time.
    ///
    /// The timestamp is truncated to microseconds, the precision stores
    /// keep.
    pub fn build_at(
        customer: CustomerInfo,
        items: Vec<LineItem>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let total_amount = Money::checked_sum(items.iter().map(|item| item.line_total))
            .ok_or(OrderError::AmountOutOfRange)?;

        Ok(Self {
            created_at: created_at.trunc_subsecs(6),
            status: OrderStatus::Received,
            total_amount,
            customer,
            items,
        })
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl From<LineItem> for NewLineItem {
    fn from(item: LineItem) -> Self {
        NewLineItem {
            product_front_id: item.product_front_id,
            category: item.category,
            product_name: item.product_name,
            base_price: item.base_price,
            line_total: item.line_total,
            quantity: item.quantity,
            selections: item.selections,
            description: item.description,
        }
    }
}

impl From<Order> for NewOrder {
    fn from(order: Order) -> Self {
        NewOrder {
            created_at: order.created_at,
            total_amount: order.total_amount,
            status: order.status,
            customer_name: order.customer.name,
            customer_phone: order.customer.phone,
            pickup_time: order.customer.pickup_time,
            items: order.items.into_iter().map(NewLineItem::from).collect(),
        }
    }
}
