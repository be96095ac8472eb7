//! Property tests for the advice evaluator.

use cropwise_core::rules::{
    ACIDIC_MESSAGE, ALKALINE_MESSAGE, FAIR_PRICE_MESSAGE, HEAT_MESSAGE, HUMIDITY_MESSAGE,
    LOW_PRICE_MESSAGE, NEUTRAL_MESSAGE, RICE_MESSAGE,
};
use cropwise_core::{evaluate, AdviceRequest, RuleKind};
use proptest::prelude::*;

fn any_reading() -> impl Strategy<Value = f64> {
    -1_000.0f64..1_000.0
}

fn any_request() -> impl Strategy<Value = AdviceRequest> {
    (".{0,16}", any_reading(), any_reading(), 0.0f64..14.0, any_reading())
        .prop_map(|(crop, t, h, ph, p)| AdviceRequest::new(crop, t, h, ph, p))
}

fn count(messages: &[&str], needle: &str) -> usize {
    messages.iter().filter(|m| **m == needle).count()
}

proptest! {
    #[test]
    fn acidic_soil_comes_first(ph in 0.0f64..5.5, req in any_request()) {
        let result = evaluate(&AdviceRequest { ph, ..req });
        prop_assert_eq!(result.messages().next(), Some(ACIDIC_MESSAGE));
    }

    #[test]
    fn alkaline_soil_comes_first(ph in 7.800001f64..14.0, req in any_request()) {
        let result = evaluate(&AdviceRequest { ph, ..req });
        prop_assert_eq!(result.messages().next(), Some(ALKALINE_MESSAGE));
    }

    #[test]
    fn neutral_band_is_inclusive(ph in 5.5f64..=7.8, req in any_request()) {
        let result = evaluate(&AdviceRequest { ph, ..req });
        prop_assert_eq!(result.messages().next(), Some(NEUTRAL_MESSAGE));
    }

    #[test]
    fn price_message_matches_threshold(price in any_reading(), req in any_request()) {
        let result = evaluate(&AdviceRequest { price, ..req });
        let messages: Vec<&str> = result.messages().collect();
        let expected = if price < 100.0 { LOW_PRICE_MESSAGE } else { FAIR_PRICE_MESSAGE };
        prop_assert_eq!(count(&messages, expected), 1);
    }

    #[test]
    fn heat_warning_only_above_35(temperature in any_reading(), req in any_request()) {
        let result = evaluate(&AdviceRequest { temperature, ..req });
        let messages: Vec<&str> = result.messages().collect();
        let expected = usize::from(temperature > 35.0);
        prop_assert_eq!(count(&messages, HEAT_MESSAGE), expected);
    }

    #[test]
    fn fungal_warning_only_above_80(humidity in any_reading(), req in any_request()) {
        let result = evaluate(&AdviceRequest { humidity, ..req });
        let messages: Vec<&str> = result.messages().collect();
        let expected = usize::from(humidity > 80.0);
        prop_assert_eq!(count(&messages, HUMIDITY_MESSAGE), expected);
    }

    #[test]
    fn rice_anywhere_in_name_triggers(prefix in "[a-z ]{0,8}", suffix in "[a-z0-9 ]{0,8}", req in any_request()) {
        let crop = format!("{}RiCe{}", prefix, suffix);
        let result = evaluate(&AdviceRequest { crop, ..req });
        prop_assert_eq!(result.messages().last(), Some(RICE_MESSAGE));
    }

    #[test]
    fn evaluation_is_deterministic(req in any_request()) {
        prop_assert_eq!(evaluate(&req), evaluate(&req));
    }

    #[test]
    fn order_is_fixed(req in any_request()) {
        let result = evaluate(&req);
        let kinds: Vec<RuleKind> = result.recommendations.iter().map(|r| r.rule).collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        prop_assert_eq!(&kinds, &sorted);
        prop_assert_eq!(kinds.first(), Some(&RuleKind::SoilPh));
        prop_assert!(result.len() >= 2 && result.len() <= 5);
    }
}

#[test]
fn boundary_values() {
    let base = AdviceRequest::new("Wheat", 35.0, 80.0, 5.5, 100.0);
    let messages: Vec<String> = evaluate(&base).messages().map(String::from).collect();
    assert_eq!(messages, vec![NEUTRAL_MESSAGE, FAIR_PRICE_MESSAGE]);

    let upper = AdviceRequest { ph: 7.8, ..base };
    assert_eq!(evaluate(&upper).messages().next(), Some(NEUTRAL_MESSAGE));
}
