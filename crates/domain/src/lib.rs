//! Domain layer of the order intake service.
//!
//! This crate provides:
//! - Normalisation and pricing of raw cart lines
//! - The order aggregate builder
//! - Composition of optional list filters into a store condition
//! - The order lifecycle service and its read models

pub mod error;
pub mod order;

pub use common::{LineItemId, Money, OrderId, OrderStatus, ProductCategory};
pub use error::DomainError;
pub use order::{
    CartLine, CreateOrder, CustomerInfo, LineItem, LineItemDetails, Order, OrderDetails,
    OrderError, OrderFilters, OrderListItem, OrderService, OrderSummary, Selections,
    UpdateStatus,
};
