//! Shared value types for the order backend.
//!
//! Identifiers, monetary amounts and the two closed enumerations
//! (order status and product category) used by every other crate.

mod order;
mod types;

pub use order::{OrderStatus, ParseEnumError, ProductCategory};
pub use types::{LineItemId, Money, OrderId};
