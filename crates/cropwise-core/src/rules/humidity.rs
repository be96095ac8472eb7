//! High humidity rule.

use crate::types::{AdviceRequest, Recommendation, RuleKind};

use super::AdviceRule;

/// Relative humidity strictly above this (%) raises the fungal-risk warning.
pub const HUMIDITY_THRESHOLD_PCT: f64 = 80.0;

pub const HUMIDITY_MESSAGE: &str =
    "High humidity — risk of fungal diseases; improve aeration/consider fungicide.";

/// Warns about fungal disease risk.
pub struct HumidityRule;

impl HumidityRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HumidityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceRule for HumidityRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Humidity
    }

    fn evaluate(&self, request: &AdviceRequest) -> Option<Recommendation> {
        (request.humidity > HUMIDITY_THRESHOLD_PCT)
            .then(|| Recommendation::new(self.kind(), HUMIDITY_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::request;

    #[test]
    fn test_humidity_threshold() {
        let rule = HumidityRule::new();
        assert!(rule.evaluate(&request("", 0.0, 80.0, 7.0, 0.0)).is_none());
        assert_eq!(
            rule.evaluate(&request("", 0.0, 80.5, 7.0, 0.0)).unwrap().message,
            HUMIDITY_MESSAGE
        );
    }
}
