use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// A payment intent as supplied by the caller.
///
/// Required fields are optional here on purpose: a structurally incomplete intent must still
/// parse so the evaluator can answer it with a `block` decision. `amount` is kept as raw JSON
/// so that a non-numeric value is observable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Intent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl Intent {
    /// Convenience constructor for a well-formed intent.
    pub fn new(date: &str, category: &str, amount: f64, merchant: Option<&str>) -> Self {
        Self {
            date: Some(date.to_string()),
            category: Some(category.to_string()),
            amount: Some(JsonValue::from(amount)),
            merchant: merchant.map(str::to_string),
            extra: BTreeMap::new(),
        }
    }

    /// Numeric amount, if the raw value is a JSON number.
    pub fn amount_value(&self) -> Option<f64> {
        self.amount.as_ref().and_then(JsonValue::as_f64)
    }

    /// Merchant with absence read as the empty string.
    pub fn merchant_or_empty(&self) -> &str {
        self.merchant.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_amount_parses_but_is_not_numeric() {
        let intent: Intent =
            serde_json::from_str(r#"{"date": "2024-01-01", "category": "food", "amount": "10"}"#)
                .expect("parse intent");
        assert_eq!(intent.amount_value(), None);
        assert_eq!(intent.merchant_or_empty(), "");
    }

    #[test]
    fn keeps_unknown_fields() {
        let intent: Intent = serde_json::from_str(
            r#"{"date": "2024-01-01", "category": "food", "amount": 3, "memo": "lunch"}"#,
        )
        .expect("parse intent");
        assert_eq!(intent.amount_value(), Some(3.0));
        assert_eq!(intent.extra["memo"], "lunch");
    }
}
