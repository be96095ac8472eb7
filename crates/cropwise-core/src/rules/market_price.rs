//! Market price rule.
//!
//! Two-way exclusive. A price of exactly 100 counts as reasonable.

use crate::types::{AdviceRequest, Recommendation, RuleKind};

use super::AdviceRule;

/// Prices strictly below this are considered low.
pub const LOW_PRICE_THRESHOLD: f64 = 100.0;

pub const LOW_PRICE_MESSAGE: &str =
    "Market price low — consider storage, processing, or alternate markets.";
pub const FAIR_PRICE_MESSAGE: &str = "Market price looks reasonable.";

/// The market price rule.
pub struct MarketPriceRule;

impl MarketPriceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarketPriceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceRule for MarketPriceRule {
    fn kind(&self) -> RuleKind {
        RuleKind::MarketPrice
    }

    fn evaluate(&self, request: &AdviceRequest) -> Option<Recommendation> {
        let message = if request.price < LOW_PRICE_THRESHOLD {
            LOW_PRICE_MESSAGE
        } else {
            FAIR_PRICE_MESSAGE
        };

        Some(Recommendation::new(self.kind(), message))
    }
}
