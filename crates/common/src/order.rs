use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a persisted or wire name does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Lifecycle state of an order.
///
/// ```text
/// Received ──► InPreparation ──► Ready ──► Completed
///     └──────────────┴─────────────┴─────► Cancelled
/// ```
///
/// The arrows describe the usual kitchen flow only. Any state may be set
/// from any other one; the status endpoint does not enforce the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order accepted at the counter, waiting to be prepared.
    #[default]
    #[serde(alias = "PENDING")]
    Received,

    /// Kitchen is working on it.
    InPreparation,

    /// Ready for pickup.
    Ready,

    /// Picked up (terminal).
    Completed,

    /// Abandoned (terminal).
    Cancelled,
}

impl OrderStatus {
    /// All states, in kitchen-flow order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Received,
        OrderStatus::InPreparation,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Returns the canonical name, as stored and sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "RECEIVED",
            OrderStatus::InPreparation => "IN_PREPARATION",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "PENDING" {
            return Ok(OrderStatus::Received);
        }
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| ParseEnumError {
                kind: "order status",
                value: s.to_string(),
            })
    }
}

/// Closed set of product categories sold at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Tacos,
    Panini,
    Bowl,
    Plate,
    Burger,
    Texmex,
    Sandwich,
    Drink,
    Dessert,
    Side,
    KidsMenu,
    Salad,
}

impl ProductCategory {
    /// Every category.
    pub const ALL: [ProductCategory; 12] = [
        ProductCategory::Tacos,
        ProductCategory::Panini,
        ProductCategory::Bowl,
        ProductCategory::Plate,
        ProductCategory::Burger,
        ProductCategory::Texmex,
        ProductCategory::Sandwich,
        ProductCategory::Drink,
        ProductCategory::Dessert,
        ProductCategory::Side,
        ProductCategory::KidsMenu,
        ProductCategory::Salad,
    ];

    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Tacos => "TACOS",
            ProductCategory::Panini => "PANINI",
            ProductCategory::Bowl => "BOWL",
            ProductCategory::Plate => "PLATE",
            ProductCategory::Burger => "BURGER",
            ProductCategory::Texmex => "TEXMEX",
            ProductCategory::Sandwich => "SANDWICH",
            ProductCategory::Drink => "DRINK",
            ProductCategory::Dessert => "DESSERT",
            ProductCategory::Side => "SIDE",
            ProductCategory::KidsMenu => "KIDS_MENU",
            ProductCategory::Salad => "SALAD",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses the canonical name only. Customer-facing spellings are resolved
/// by the domain's synonym table.
impl FromStr for ProductCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "product category",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_received() {
        assert_eq!(OrderStatus::default(), OrderStatus::Received);
    }

    #[test]
    fn status_wire_names() {
        let json = serde_json::to_string(&OrderStatus::InPreparation).unwrap();
        assert_eq!(json, "\"IN_PREPARATION\"");

        let legacy: OrderStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(legacy, OrderStatus::Received);
    }

    #[test]
    fn status_from_str_round_trips_canonical_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!("ready".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(!OrderStatus::Received.is_terminal());
        assert!(!OrderStatus::InPreparation.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn category_serde_matches_canonical_name() {
        for category in ProductCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(category.as_str().parse::<ProductCategory>().unwrap(), category);
        }
    }

    #[test]
    fn category_from_str_rejects_synonyms() {
        let err = "taco".parse::<ProductCategory>().unwrap_err();
        assert_eq!(err.value, "taco");
    }
}
