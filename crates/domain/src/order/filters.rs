//! Composition of optional list filters into one store condition.
//!
//! Each filter maps its optional input to either no constraint or a single
//! condition. Present conditions are folded together with AND, so an absent
//! filter never excludes anything.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, OrderStatus};
use order_store::{Condition, Range, TextField};

/// Optional filter inputs of an order listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
    /// Free-text search over customer, phone, item names and ID.
    pub q: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub min_total: Option<Money>,
    pub max_total: Option<Money>,
}

impl OrderFilters {
    /// Builds the combined condition of every present filter.
    pub fn to_condition(&self) -> Condition {
        Condition::and(
            [
                status_is(self.status),
                search(self.q.as_deref()),
                customer_name_like(self.customer_name.as_deref()),
                customer_phone_like(self.customer_phone.as_deref()),
                created_between(self.created_from, self.created_to),
                total_between(self.min_total, self.max_total),
            ]
            .into_iter()
            .flatten(),
        )
    }
}

/// Exact status match.
pub fn status_is(status: Option<OrderStatus>) -> Option<Condition> {
    status.map(Condition::StatusIs)
}

/// Case-insensitive substring match on the customer name.
pub fn customer_name_like(text: Option<&str>) -> Option<Condition> {
    non_blank(text).map(|text| Condition::contains(TextField::CustomerName, text))
}

/// Case-insensitive substring match on the customer phone.
pub fn customer_phone_like(text: Option<&str>) -> Option<Condition> {
    non_blank(text).map(|text| Condition::contains(TextField::CustomerPhone, text))
}

/// Inclusive creation date range. Either bound may be absent.
pub fn created_between(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Option<Condition> {
    bounded(from, to).map(Condition::CreatedWithin)
}

/// Inclusive total amount range. Either bound may be absent.
pub fn total_between(min: Option<Money>, max: Option<Money>) -> Option<Condition> {
    bounded(min, max).map(Condition::TotalWithin)
}

/// Free-text search.
///
/// Matches the customer name, the customer phone or the product name of
/// any line item. Text that parses as an integer also matches the order
/// with that ID.
pub fn search(q: Option<&str>) -> Option<Condition> {
    let q = non_blank(q)?;

    let mut alternatives = vec![
        Condition::contains(TextField::CustomerName, q),
        Condition::contains(TextField::CustomerPhone, q),
        Condition::contains(TextField::ItemProductName, q),
    ];
    if let Some(id) = OrderId::parse_lenient(q) {
        alternatives.push(Condition::IdIs(id));
    }

    Some(Condition::or(alternatives))
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.trim().is_empty())
}

fn bounded<T: PartialOrd>(from: Option<T>, to: Option<T>) -> Option<Range<T>> {
    let range = Range::new(from, to);
    (!range.is_unbounded()).then_some(range)
}
