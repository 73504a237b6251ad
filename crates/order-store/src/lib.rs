//! Durable storage for order aggregates.
//!
//! - [`OrderStore`] / [`OrderTransaction`]: the unit-of-work interface
//! - [`Condition`]: backend-neutral predicate tree built by the domain
//! - [`InMemoryOrderStore`] and [`PostgresOrderStore`] implementations

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::{LineItemId, Money, OrderId, OrderStatus, ProductCategory};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use query::{Condition, Page, PageRequest, Range, Sort, SortDirection, SortKey, TextField};
pub use record::{LineItemRecord, NewLineItem, NewOrder, OrderRecord, OrderWrite};
pub use store::{OrderStore, OrderTransaction, OrderTransactionExt};
