//! Core types for advice evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured agronomic input, built fresh for every evaluation.
///
/// Numeric fields are always finite once a request has been parsed from a
/// form; constructing one directly is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceRequest {
    /// Free-text crop name (may be empty)
    pub crop: String,

    /// Air temperature in °C
    #[serde(rename = "temp")]
    pub temperature: f64,

    /// Relative humidity in percent
    #[serde(rename = "hum")]
    pub humidity: f64,

    /// Soil pH
    pub ph: f64,

    /// Market price in local currency units
    pub price: f64,
}

impl AdviceRequest {
    /// Create a request from already-validated values.
    pub fn new(
        crop: impl Into<String>,
        temperature: f64,
        humidity: f64,
        ph: f64,
        price: f64,
    ) -> Self {
        Self {
            crop: crop.into(),
            temperature,
            humidity,
            ph,
            price,
        }
    }

    /// Serialize to the JSON shape stored in the advice log.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The numeric fields of an advice form, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceField {
    Temperature,
    Humidity,
    Ph,
    Price,
}

impl AdviceField {
    /// All numeric fields in the order they are parsed.
    pub const ALL: [AdviceField; 4] = [
        AdviceField::Temperature,
        AdviceField::Humidity,
        AdviceField::Ph,
        AdviceField::Price,
    ];

    /// Form key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            AdviceField::Temperature => "temp",
            AdviceField::Humidity => "hum",
            AdviceField::Ph => "ph",
            AdviceField::Price => "price",
        }
    }
}

impl fmt::Display for AdviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdviceField::Temperature => "temperature",
            AdviceField::Humidity => "humidity",
            AdviceField::Ph => "pH",
            AdviceField::Price => "price",
        };
        write!(f, "{}", name)
    }
}

/// Identifies which rule produced a recommendation.
///
/// Variants are declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    SoilPh,
    Heat,
    Humidity,
    MarketPrice,
    Rice,
}

impl RuleKind {
    /// Human-readable rule name.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::SoilPh => "Soil pH",
            RuleKind::Heat => "Temperature",
            RuleKind::Humidity => "Humidity",
            RuleKind::MarketPrice => "Market price",
            RuleKind::Rice => "Rice crop",
        }
    }
}

/// One advisory message produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The rule that fired
    pub rule: RuleKind,

    /// Message shown to the requester
    pub message: String,
}

impl Recommendation {
    pub fn new(rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Ordered recommendations for one request.
///
/// Order is always soil pH, temperature, humidity, market price, crop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub recommendations: Vec<Recommendation>,
}

impl AdviceResult {
    /// Iterate over the message strings in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.recommendations.iter().map(|r| r.message.as_str())
    }

    /// Messages joined by a single space, as stored in the advice log.
    pub fn text(&self) -> String {
        self.messages().collect::<Vec<_>>().join(" ")
    }

    /// Whether a given rule contributed a message.
    pub fn has(&self, rule: RuleKind) -> bool {
        self.recommendations.iter().any(|r| r.rule == rule)
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}
