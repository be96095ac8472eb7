//! Recommendation rules.
//!
//! Each rule looks at one aspect of an [`AdviceRequest`] and contributes zero
//! or one message. Rules never see each other's output; the [`Evaluator`]
//! runs them in a fixed order and collects what they produce.
//!
//! [`Evaluator`]: crate::Evaluator

mod heat;
mod humidity;
mod market_price;
mod rice;
mod soil_ph;

pub use heat::{HeatRule, HEAT_MESSAGE, HEAT_THRESHOLD_C};
pub use humidity::{HumidityRule, HUMIDITY_MESSAGE, HUMIDITY_THRESHOLD_PCT};
pub use market_price::{MarketPriceRule, FAIR_PRICE_MESSAGE, LOW_PRICE_MESSAGE, LOW_PRICE_THRESHOLD};
pub use rice::{RiceRule, RICE_KEYWORD, RICE_MESSAGE};
pub use soil_ph::{
    SoilPhRule, ACIDIC_BELOW, ACIDIC_MESSAGE, ALKALINE_ABOVE, ALKALINE_MESSAGE, NEUTRAL_MESSAGE,
};

use crate::types::{AdviceRequest, Recommendation, RuleKind};

/// A single fixed branch of agronomic logic.
pub trait AdviceRule: Send + Sync {
    /// Which rule this is.
    fn kind(&self) -> RuleKind;

    /// Evaluate the request.
    ///
    /// Returns `None` when the rule has nothing to say. Implementations must
    /// be pure: same request, same answer.
    fn evaluate(&self, request: &AdviceRequest) -> Option<Recommendation>;

    /// Short human-readable name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// The built-in rules in evaluation order.
pub fn default_rules() -> Vec<Box<dyn AdviceRule>> {
    vec![
        Box::new(SoilPhRule::new()),
        Box::new(HeatRule::new()),
        Box::new(HumidityRule::new()),
        Box::new(MarketPriceRule::new()),
        Box::new(RiceRule::new()),
    ]
}

#[cfg(test)]
pub(crate) fn request(crop: &str, temperature: f64, humidity: f64, ph: f64, price: f64) -> AdviceRequest {
    AdviceRequest::new(crop, temperature, humidity, ph, price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_in_evaluation_order() {
        let kinds: Vec<RuleKind> = default_rules().iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::SoilPh,
                RuleKind::Heat,
                RuleKind::Humidity,
                RuleKind::MarketPrice,
                RuleKind::Rice,
            ]
        );
    }
}
