//! Crop-keyword rule for rice.

use crate::types::{AdviceRequest, Recommendation, RuleKind};

use super::AdviceRule;

/// Matched case-insensitively anywhere in the crop name.
pub const RICE_KEYWORD: &str = "rice";

pub const RICE_MESSAGE: &str = "Rice: maintain water level; check for blast & sheath blight.";

/// Adds water-level and pest-watch advice for rice crops.
pub struct RiceRule;

impl RiceRule {
    pub fn new() -> Self {
        Self
    }

    /// Substring match, not whole word: "Ricecake" matches.
    pub fn matches(crop: &str) -> bool {
        crop.to_lowercase().contains(RICE_KEYWORD)
    }
}

impl Default for RiceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceRule for RiceRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Rice
    }

    fn evaluate(&self, request: &AdviceRequest) -> Option<Recommendation> {
        Self::matches(&request.crop).then(|| Recommendation::new(self.kind(), RICE_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_substring() {
        for crop in ["Rice", "BASMATI RICE", "rice1", "Ricecake", "brown rice"] {
            assert!(RiceRule::matches(crop), "{crop} should match");
        }
    }

    #[test]
    fn test_non_matching_crops() {
        for crop in ["", "Wheat", "ric", "r i c e", "Maize"] {
            assert!(!RiceRule::matches(crop), "{crop} should not match");
        }
    }
}
