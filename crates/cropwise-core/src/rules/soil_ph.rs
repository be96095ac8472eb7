//! Soil pH rule.
//!
//! Three-way exclusive: acidic, alkaline, or okay. Always produces a message.

use crate::types::{AdviceRequest, Recommendation, RuleKind};

use super::AdviceRule;

/// Below this pH the soil is treated as acidic.
pub const ACIDIC_BELOW: f64 = 5.5;

/// Above this pH the soil is treated as alkaline.
pub const ALKALINE_ABOVE: f64 = 7.8;

pub const ACIDIC_MESSAGE: &str = "Soil acidic — consider liming (apply agricultural lime).";
pub const ALKALINE_MESSAGE: &str = "Soil alkaline — add organic matter or sulfur carefully.";
pub const NEUTRAL_MESSAGE: &str = "Soil pH okay.";

/// The soil pH rule.
pub struct SoilPhRule;

impl SoilPhRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SoilPhRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceRule for SoilPhRule {
    fn kind(&self) -> RuleKind {
        RuleKind::SoilPh
    }

    fn evaluate(&self, request: &AdviceRequest) -> Option<Recommendation> {
        // Both boundaries belong to the "okay" band.
        let message = if request.ph < ACIDIC_BELOW {
            ACIDIC_MESSAGE
        } else if request.ph > ALKALINE_ABOVE {
            ALKALINE_MESSAGE
        } else {
            NEUTRAL_MESSAGE
        };

        Some(Recommendation::new(self.kind(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::request;

    fn message_for(ph: f64) -> String {
        SoilPhRule::new()
            .evaluate(&request("Wheat", 20.0, 50.0, ph, 150.0))
            .unwrap()
            .message
    }

    #[test]
    fn test_acidic_soil() {
        assert_eq!(message_for(4.2), ACIDIC_MESSAGE);
        assert_eq!(message_for(5.49), ACIDIC_MESSAGE);
    }

    #[test]
    fn test_alkaline_soil() {
        assert_eq!(message_for(7.81), ALKALINE_MESSAGE);
        assert_eq!(message_for(9.0), ALKALINE_MESSAGE);
    }

    #[test]
    fn test_boundaries_are_okay() {
        assert_eq!(message_for(5.5), NEUTRAL_MESSAGE);
        assert_eq!(message_for(7.8), NEUTRAL_MESSAGE);
        assert_eq!(message_for(7.0), NEUTRAL_MESSAGE);
    }
}
