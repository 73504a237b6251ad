//! Order aggregate and related types.

mod aggregate;
mod category;
mod commands;
mod filters;
mod pricing;
mod projections;
mod service;
mod value_objects;

pub use aggregate::{LineItem, Order};
pub use category::{resolve_category, synonyms_of};
pub use commands::*;
pub use filters::{
    OrderFilters, created_between, customer_name_like, customer_phone_like, search, status_is,
    total_between,
};
pub use pricing::normalize_line;
pub use projections::{LineItemDetails, OrderDetails, OrderListItem, OrderSummary};
pub use service::OrderService;
pub use value_objects::{CustomerInfo, Selections};

use thiserror::Error;

/// Business-rule rejections of order input.
#[derive(Debug, Error)]
pub enum OrderError {
    /// An order needs at least one line item.
    #[error("Order must contain at least one item")]
    EmptyCart,

    /// A cart line carries no product type.
    #[error("Product type is required")]
    MissingCategory,

    /// The product type is not in the synonym table.
    #[error("Unknown product type: {value}")]
    UnknownCategory { value: String },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },

    /// A line total or the order total does not fit the money range.
    #[error("Amount out of range")]
    AmountOutOfRange,
}
