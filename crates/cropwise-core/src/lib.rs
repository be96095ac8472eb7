//! # cropwise-core
//!
//! Deterministic rule-based agronomic advice.
//!
//! Given a crop name plus temperature, humidity, soil pH and market price,
//! the evaluator produces an ordered list of recommendations.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same request always produces the same messages in the same order
//! 2. **Pure**: No I/O, no shared state; safe to call from any number of threads
//! 3. **Fixed thresholds**: 5.5 / 7.8 pH, 35 °C, 80 % humidity, price 100
//!
//! Logging the request is the caller's business; see `cropwise-runtime`.
//!
//! ## Example
//!
//! ```rust
//! use cropwise_core::{evaluate_form, AdviceForm, MissingFieldPolicy};
//!
//! let form = AdviceForm::new()
//!     .crop("Wheat")
//!     .temp("20")
//!     .hum("50")
//!     .ph("7.0")
//!     .price("150");
//!
//! let result = evaluate_form(&form, MissingFieldPolicy::Strict).unwrap();
//! let messages: Vec<&str> = result.messages().collect();
//! assert_eq!(messages, ["Soil pH okay.", "Market price looks reasonable."]);
//! ```

pub mod evaluator;
pub mod form;
pub mod rules;
pub mod types;

// Re-export main types at crate root
pub use evaluator::Evaluator;
pub use form::{parse_form, AdviceForm, MissingFieldPolicy, DEFAULT_PH, DEFAULT_READING};
pub use rules::{AdviceRule, HeatRule, HumidityRule, MarketPriceRule, RiceRule, SoilPhRule};
pub use types::{AdviceField, AdviceRequest, AdviceResult, Recommendation, RuleKind};

use thiserror::Error;

/// Generic message shown to a requester whose form did not parse.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid numeric input";

/// Errors that can occur while preparing an evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdviceError {
    #[error("Invalid numeric input for {field}: {value:?}")]
    InvalidInput { field: AdviceField, value: String },
}

impl AdviceError {
    /// The field that failed to parse.
    pub fn field(&self) -> AdviceField {
        match self {
            AdviceError::InvalidInput { field, .. } => *field,
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        INVALID_INPUT_MESSAGE
    }
}

/// Evaluate a request against the built-in rules.
///
/// This is the main entry point. It never fails and never writes anywhere.
pub fn evaluate(request: &AdviceRequest) -> AdviceResult {
    Evaluator::new().evaluate(request)
}

/// Parse a raw form and evaluate it.
///
/// On invalid input no rule runs.
pub fn evaluate_form(form: &AdviceForm, policy: MissingFieldPolicy) -> Result<AdviceResult, AdviceError> {
    let request = parse_form(form, policy)?;
    Ok(evaluate(&request))
}
