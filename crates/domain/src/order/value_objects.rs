//! Value objects for the order domain.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form per-item configuration (meats, sauces, extras...).
///
/// The document is never interpreted here. It is stored as compact JSON
/// text and decoded back into the same structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(Value);

impl Selections {
    /// Wraps an arbitrary JSON document.
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// Consumes the wrapper, returning the document.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Serialises the document to its stored text form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Parses a stored text form.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self)
    }
}

impl From<Value> for Selections {
    fn from(document: Value) -> Self {
        Self(document)
    }
}

/// Customer and pickup metadata of an order.
///
/// Copied through unchanged; shape checks belong to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Shop-local pickup time.
    pub pickup_time: Option<NaiveDateTime>,
}

impl CustomerInfo {
    /// Creates customer info with a name and phone.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            phone: Some(phone.into()),
            pickup_time: None,
        }
    }

    /// Sets the pickup time.
    pub fn with_pickup_time(mut self, pickup_time: NaiveDateTime) -> Self {
        self.pickup_time = Some(pickup_time);
        self
    }
}
