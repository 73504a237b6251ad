//! Read models returned by the lifecycle service.

use chrono::{DateTime, NaiveDateTime, Utc};
use common::{LineItemId, Money, OrderId, OrderStatus, ProductCategory};
use order_store::{LineItemRecord, OrderRecord};
use serde::Serialize;

/// Minimal view returned by create and status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
}

/// One row of an order listing. Carries no line item detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderListItem {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
    pub pickup_time: Option<NaiveDateTime>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub item_count: usize,
}

/// Full view of an order and its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
    pub pickup_time: Option<NaiveDateTime>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub item_count: usize,
    pub items: Vec<LineItemDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemDetails {
    pub id: LineItemId,
    pub product_front_id: Option<i64>,
    pub category: ProductCategory,
    pub product_name: String,
    pub base_price: Money,
    pub line_total: Money,
    pub quantity: u32,
    /// Stored selection document text.
    pub selections: Option<String>,
    pub description: Option<String>,
}

impl From<&OrderRecord> for OrderSummary {
    fn from(order: &OrderRecord) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total_amount: order.total_amount,
            created_at: order.created_at,
        }
    }
}

impl From<OrderRecord> for OrderListItem {
    fn from(order: OrderRecord) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total_amount: order.total_amount,
            created_at: order.created_at,
            pickup_time: order.pickup_time,
            item_count: order.item_count(),
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
        }
    }
}

impl From<OrderRecord> for OrderDetails {
    fn from(order: OrderRecord) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total_amount: order.total_amount,
            created_at: order.created_at,
            pickup_time: order.pickup_time,
            item_count: order.item_count(),
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            items: order.items.into_iter().map(LineItemDetails::from).collect(),
        }
    }
}

impl From<LineItemRecord> for LineItemDetails {
    fn from(item: LineItemRecord) -> Self {
        Self {
            id: item.id,
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
