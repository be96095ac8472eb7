//! Parsing raw form input into an [`AdviceRequest`].
//!
//! Defaulting of missing fields is a caller policy, not part of the
//! evaluator's contract. [`MissingFieldPolicy::Lenient`] reproduces the
//! permissive behavior users of the advice form are used to; `Strict`
//! rejects any request with a missing numeric field.
//!
//! A field is missing when it is absent or the empty string. Whitespace-only
//! input is present and fails to parse under either policy.

use serde::{Deserialize, Serialize};

use crate::types::{AdviceField, AdviceRequest};
use crate::AdviceError;

/// pH assumed when the field is missing under the lenient policy.
pub const DEFAULT_PH: f64 = 7.0;

/// Temperature, humidity and price assumed when missing.
pub const DEFAULT_READING: f64 = 0.0;

/// What to do with absent or empty numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Substitute defaults (pH 7.0, everything else 0.0).
    #[default]
    Lenient,
    /// Treat a missing numeric field as invalid input.
    Strict,
}

/// Untrusted form values as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceForm {
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub temp: Option<String>,
    #[serde(default)]
    pub hum: Option<String>,
    #[serde(default)]
    pub ph: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

impl AdviceForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from key/value pairs using the form keys
    /// `crop`, `temp`, `hum`, `ph` and `price`. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let value = Some(value.into());
            match key.as_ref() {
                "crop" => form.crop = value,
                "temp" => form.temp = value,
                "hum" => form.hum = value,
                "ph" => form.ph = value,
                "price" => form.price = value,
                _ => {}
            }
        }
        form
    }

    pub fn crop(mut self, value: impl Into<String>) -> Self {
        self.crop = Some(value.into());
        self
    }

    pub fn temp(mut self, value: impl Into<String>) -> Self {
        self.temp = Some(value.into());
        self
    }

    pub fn hum(mut self, value: impl Into<String>) -> Self {
        self.hum = Some(value.into());
        self
    }

    pub fn ph(mut self, value: impl Into<String>) -> Self {
        self.ph = Some(value.into());
        self
    }

    pub fn price(mut self, value: impl Into<String>) -> Self {
        self.price = Some(value.into());
        self
    }

    fn raw(&self, field: AdviceField) -> Option<&str> {
        match field {
            AdviceField::Temperature => self.temp.as_deref(),
            AdviceField::Humidity => self.hum.as_deref(),
            AdviceField::Ph => self.ph.as_deref(),
            AdviceField::Price => self.price.as_deref(),
        }
    }
}

fn default_for(field: AdviceField) -> f64 {
    match field {
        AdviceField::Ph => DEFAULT_PH,
        _ => DEFAULT_READING,
    }
}

/// Parse one numeric field.
///
/// Only an absent or empty value counts as missing. Anything else is
/// trimmed and parsed, so whitespace-only input is invalid. Non-finite
/// values are rejected.
pub fn parse_field(
    field: AdviceField,
    raw: Option<&str>,
    policy: MissingFieldPolicy,
) -> Result<f64, AdviceError> {
    let raw = match raw {
        None | Some("") => {
            return match policy {
                MissingFieldPolicy::Lenient => Ok(default_for(field)),
                MissingFieldPolicy::Strict => Err(AdviceError::InvalidInput {
                    field,
                    value: String::new(),
                }),
            };
        }
        Some(raw) => raw,
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AdviceError::InvalidInput {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Parse a whole form. Fails on the first invalid field, in the order
/// temperature, humidity, pH, price.
pub fn parse_form(form: &AdviceForm, policy: MissingFieldPolicy) -> Result<AdviceRequest, AdviceError> {
    let mut values = [0.0; 4];
    for (slot, field) in values.iter_mut().zip(AdviceField::ALL) {
        *slot = parse_field(field, form.raw(field), policy)?;
    }
    let [temperature, humidity, ph, price] = values;

    Ok(AdviceRequest::new(
        form.crop.clone().unwrap_or_default(),
        temperature,
        humidity,
        ph,
        price,
    ))
}
