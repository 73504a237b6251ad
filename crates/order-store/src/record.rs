//! Persisted shapes of the order aggregate.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{LineItemId, Money, OrderId, OrderStatus, ProductCategory};

/// A line item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    /// Front-end catalogue reference. Opaque, never checked.
    pub product_front_id: Option<i64>,
    pub category: ProductCategory,
    /// Name captured at order time.
    pub product_name: String,
    pub base_price: Money,
    pub line_total: Money,
    pub quantity: u32,
    /// Serialised selection document, stored verbatim.
    pub selections: Option<String>,
    pub description: Option<String>,
}

/// A stored line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemRecord {
    pub id: LineItemId,
    pub product_front_id: Option<i64>,
    pub category: ProductCategory,
    pub product_name: String,
    pub base_price: Money,
    pub line_total: Money,
    pub quantity: u32,
    pub selections: Option<String>,
    pub description: Option<String>,
}

impl LineItemRecord {
    /// Attaches a store-assigned ID to a new line item.
    pub fn from_new(id: LineItemId, item: NewLineItem) -> Self {
        Self {
            id,
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

/// An order aggregate that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub created_at: DateTime<Utc>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub pickup_time: Option<NaiveDateTime>,
    pub items: Vec<NewLineItem>,
}

/// A stored order aggregate with its line items in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub pickup_time: Option<NaiveDateTime>,
    pub items: Vec<LineItemRecord>,
}

impl OrderRecord {
    /// Number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A write against the store.
///
/// Line items are immutable once created, so the only update is the
/// status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderWrite {
    /// Insert a new aggregate together with all its line items.
    Insert(NewOrder),

    /// Overwrite the status of an existing order.
    UpdateStatus { id: OrderId, status: OrderStatus },
}
