//! High temperature rule.

use crate::types::{AdviceRequest, Recommendation, RuleKind};

use super::AdviceRule;

/// Temperatures strictly above this (°C) trigger the irrigation warning.
pub const HEAT_THRESHOLD_C: f64 = 35.0;

pub const HEAT_MESSAGE: &str = "High temperature — increase irrigation in mornings/evenings.";

/// Warns about irrigation timing in hot weather.
pub struct HeatRule;

impl HeatRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeatRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceRule for HeatRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Heat
    }

    fn evaluate(&self, request: &AdviceRequest) -> Option<Recommendation> {
        (request.temperature > HEAT_THRESHOLD_C)
            .then(|| Recommendation::new(self.kind(), HEAT_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::request;

    #[test]
    fn test_fires_above_threshold() {
        let rec = HeatRule::new().evaluate(&request("", 35.1, 0.0, 7.0, 0.0));
        assert_eq!(rec.unwrap().message, HEAT_MESSAGE);
    }

    #[test]
    fn test_silent_at_threshold() {
        assert!(HeatRule::new()
            .evaluate(&request("", 35.0, 0.0, 7.0, 0.0))
            .is_none());
        assert!(HeatRule::new()
            .evaluate(&request("", -4.0, 0.0, 7.0, 0.0))
            .is_none());
    }
}
