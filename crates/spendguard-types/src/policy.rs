use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Spend policy document (`policy.json`).
///
/// Unknown keys are kept in `extra` so that the policy hash covers the whole document,
/// including provenance blocks such as `_source`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Policy {
    /// Opaque version label; `v0` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Cap on total spend per date. Absent means uncapped.
    #[serde(
        default,
        alias = "daily_budget_usdc",
        skip_serializing_if = "Option::is_none"
    )]
    pub daily_budget: Option<f64>,

    /// Per-category caps. A category without an entry, or with a `null` entry, is uncapped.
    #[serde(
        default,
        alias = "category_caps_usdc",
        deserialize_with = "caps_without_nulls",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    #[schemars(with = "Option<BTreeMap<String, Option<f64>>>")]
    pub category_caps: BTreeMap<String, f64>,

    /// Merchants that are always denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_merchants: Vec<String>,

    /// Lane partitioning: `category` or `default`. Any other value behaves like `default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_by: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

fn caps_without_nulls<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, f64>, D::Error> {
    let raw = Option::<BTreeMap<String, Option<f64>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(category, cap)| cap.map(|cap| (category, cap)))
        .collect())
}

/// A policy together with the JSON document it was read from.
///
/// The policy hash commits to `source` exactly as written (legacy `*_usdc` keys, explicit
/// nulls, empty lists), so anyone holding `policy.json` can re-derive it.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyDocument {
    pub policy: Policy,
    pub source: JsonValue,
}

impl PolicyDocument {
    pub fn from_value(source: JsonValue) -> Result<Self, serde_json::Error> {
        let policy = Policy::deserialize(&source)?;
        Ok(Self { policy, source })
    }

    /// Wrap a policy built in memory; its document is its own serialization.
    pub fn from_policy(policy: Policy) -> Result<Self, serde_json::Error> {
        let source = serde_json::to_value(&policy)?;
        Ok(Self { policy, source })
    }
}

/// How intents are partitioned into sequencing lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaneBy {
    Category,
    Default,
}

impl Policy {
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(ids::DEFAULT_POLICY_VERSION)
    }

    pub fn lane_by(&self) -> LaneBy {
        match self.lane_by.as_deref() {
            Some("category") => LaneBy::Category,
            _ => LaneBy::Default,
        }
    }

    pub fn category_cap(&self, category: &str) -> Option<f64> {
        self.category_caps.get(category).copied()
    }

    pub fn is_blocked(&self, merchant: &str) -> bool {
        self.blocked_merchants.iter().any(|m| m == merchant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_usdc_keys() {
        let policy: Policy = serde_json::from_str(
            r#"{"daily_budget_usdc": 15, "category_caps_usdc": {"food": 12}, "lane_by": "category"}"#,
        )
        .expect("parse policy");

        assert_eq!(policy.daily_budget, Some(15.0));
        assert_eq!(policy.category_cap("food"), Some(12.0));
        assert_eq!(policy.lane_by(), LaneBy::Category);
    }

    #[test]
    fn defaults_when_fields_are_absent() {
        let policy: Policy = serde_json::from_str("{}").expect("parse policy");
        assert_eq!(policy.version(), "v0");
        assert_eq!(policy.daily_budget, None);
        assert_eq!(policy.category_cap("food"), None);
        assert_eq!(policy.lane_by(), LaneBy::Default);
        assert!(!policy.is_blocked(""));
    }

    #[test]
    fn unknown_lane_mode_falls_back_to_default() {
        let policy: Policy =
            serde_json::from_str(r#"{"lane_by": "merchant"}"#).expect("parse policy");
        assert_eq!(policy.lane_by(), LaneBy::Default);
    }

    #[test]
    fn null_caps_read_as_uncapped() {
        let policy: Policy =
            serde_json::from_str(r#"{"category_caps": {"food": null, "transport": 4}}"#)
                .expect("parse policy");
        assert_eq!(policy.category_cap("food"), None);
        assert_eq!(policy.category_cap("transport"), Some(4.0));

        let policy: Policy =
            serde_json::from_str(r#"{"category_caps_usdc": null}"#).expect("parse policy");
        assert!(policy.category_caps.is_empty());
    }

    #[test]
    fn document_keeps_source_as_written() {
        let doc = PolicyDocument::from_value(serde_json::json!({
            "version": null,
            "daily_budget_usdc": 15,
            "blocked_merchants": [],
        }))
        .expect("document");
        assert_eq!(doc.policy.daily_budget, Some(15.0));
        assert_eq!(doc.policy.version(), "v0");
        assert!(doc.source.get("daily_budget").is_none());
        assert_eq!(doc.source["version"], JsonValue::Null);
        assert_eq!(doc.source["blocked_merchants"], serde_json::json!([]));
    }

    #[test]
    fn in_memory_policy_documents_its_serialization() {
        let policy = Policy {
            daily_budget: Some(5.0),
            ..Policy::default()
        };
        let doc = PolicyDocument::from_policy(policy.clone()).expect("document");
        assert_eq!(doc.source, serde_json::json!({"daily_budget": 5.0}));
        assert_eq!(doc.policy, policy);
    }

    #[test]
    fn extra_keys_survive_round_trip() {
        let policy: Policy = serde_json::from_str(
            r#"{"version": "v3", "_source": {"kind": "nlp-lite", "text": "daily 5"}}"#,
        )
        .expect("parse policy");
        assert_eq!(policy.version(), "v3");

        let value = serde_json::to_value(&policy).expect("serialize policy");
        assert_eq!(value["_source"]["kind"], "nlp-lite");
        assert!(value.get("daily_budget").is_none());
    }
}
