use chrono::{DateTime, Utc};

use crate::{Money, OrderId, OrderStatus};

/// Text columns that support case-insensitive substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    CustomerName,
    CustomerPhone,
    /// Product name of any line item of the order.
    ItemProductName,
}

impl TextField {
    /// Returns true if the field lives on line items rather than the order.
    pub fn is_item_field(&self) -> bool {
        matches!(self, TextField::ItemProductName)
    }
}

/// Inclusive range with optional bounds on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range<T> {
    pub from: Option<T>,
    pub to: Option<T>,
}

impl<T: PartialOrd> Range<T> {
    /// Creates a range. Either bound may be absent.
    pub fn new(from: Option<T>, to: Option<T>) -> Self {
        Self { from, to }
    }

    /// Returns true if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true if the value lies within the bounds, both inclusive.
    pub fn contains(&self, value: &T) -> bool {
        if let Some(from) = &self.from
            && value < from
        {
            return false;
        }
        if let Some(to) = &self.to
            && value > to
        {
            return false;
        }
        true
    }
}

/// Backend-neutral predicate over an order and its line items.
///
/// Built by the domain from optional filter inputs, then translated by each
/// store into its native query form. Conditions on line items mean "at
/// least one item matches", and a store must never return the same order
/// twice because several of its items matched.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// Matches every order.
    #[default]
    All,

    /// Status equals the given value.
    StatusIs(OrderStatus),

    /// Order ID equals the given value.
    IdIs(OrderId),

    /// Lower-cased field contains the (already lower-cased, trimmed) needle.
    Contains { field: TextField, needle: String },

    /// Creation timestamp within the range.
    CreatedWithin(Range<DateTime<Utc>>),

    /// Total amount within the range.
    TotalWithin(Range<Money>),

    /// Every child matches. Empty means true.
    And(Vec<Condition>),

    /// At least one child matches. Empty means false.
    Or(Vec<Condition>),
}

impl Condition {
    /// Creates a substring condition, normalising the needle.
    pub fn contains(field: TextField, text: &str) -> Self {
        Condition::Contains {
            field,
            needle: text.trim().to_lowercase(),
        }
    }

    /// Combines conditions with AND.
    ///
    /// Nested ANDs are flattened and `All` operands dropped, so the result
    /// does not depend on how the operands were grouped.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut operands = Vec::new();
        for condition in conditions {
            match condition {
                Condition::All => {}
                Condition::And(children) => {
                    operands.extend(children.into_iter().filter(|c| *c != Condition::All))
                }
                other => operands.push(other),
            }
        }

        match operands.len() {
            0 => Condition::All,
            1 => operands.remove(0),
            _ => Condition::And(operands),
        }
    }

    /// Combines conditions with OR.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut operands: Vec<_> = conditions.into_iter().collect();
        if operands.len() == 1 {
            return operands.remove(0);
        }
        Condition::Or(operands)
    }

    /// Returns true if evaluating this condition needs line item data.
    pub fn requires_item_join(&self) -> bool {
        match self {
            Condition::Contains { field, .. } => field.is_item_field(),
            Condition::And(children) | Condition::Or(children) => {
                children.iter().any(Condition::requires_item_join)
            }
            _ => false,
        }
    }
}

/// Column a page is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    TotalAmount,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Ordering of a page. Ties are broken by order ID in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Which slice of the result set to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,

    /// Page size, clamped to `1..=MAX_SIZE`.
    pub size: u32,

    pub sort: Sort,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 20;
    pub const MAX_SIZE: u32 = 100;

    /// Creates a page request with the default sort, clamping the size.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, Self::MAX_SIZE),
            sort: Sort::default(),
        }
    }

    /// Sets the sort order.
    pub fn sorted_by(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

/// One page of results plus the metadata needed to paginate.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Builds a page from its content and the total match count.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(request.size)),
        }
    }

    /// Transforms the content, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
