//! Evaluator: runs every rule in fixed order and collects the messages.
//!
//! The rule set and its order are not configurable:
//! 1. Soil pH (always one message)
//! 2. Temperature (zero or one)
//! 3. Humidity (zero or one)
//! 4. Market price (always one message)
//! 5. Rice crop keyword (zero or one)

use tracing::debug;

use crate::rules::{default_rules, AdviceRule};
use crate::types::{AdviceRequest, AdviceResult};

/// Stateless evaluator over the built-in rules.
pub struct Evaluator {
    rules: Vec<Box<dyn AdviceRule>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// The rules in the order they run.
    pub fn rules(&self) -> impl Iterator<Item = &dyn AdviceRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Evaluate a request.
    pub fn evaluate(&self, request: &AdviceRequest) -> AdviceResult {
        let recommendations = self
            .rules
            .iter()
            .filter_map(|rule| {
                let finding = rule.evaluate(request);
                debug!(rule = rule.name(), fired = finding.is_some(), "rule evaluated");
                finding
            })
            .collect();

        AdviceResult { recommendations }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
