use crate::decision::Nonce2d;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Caller-owned ledger snapshot (`ledger.json`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ledger {
    /// Committed spend, in append order.
    #[serde(default)]
    pub events: Vec<LedgerEvent>,

    /// Last issued sequence per lane.
    #[serde(default)]
    pub nonce_state: NonceState,
}

/// One committed spend record.
///
/// Stored ledgers may have been written by other tools, so every field is tolerant:
/// a missing or non-numeric `amount` reads as `None` and counts as zero spend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LedgerEvent {
    /// RFC 3339 commit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub category: String,

    #[schemars(with = "Option<f64>")]
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,

    #[serde(default)]
    pub merchant: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Nonce2d>,
}

impl LedgerEvent {
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(JsonValue::as_f64))
}

/// Lane -> last issued sequence number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NonceState(BTreeMap<String, u64>);

impl NonceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last sequence issued on `lane`, `0` if the lane has never been used.
    pub fn current(&self, lane: &str) -> u64 {
        self.0.get(lane).copied().unwrap_or(0)
    }

    /// Copy of this state with `lane` set to `sequence`.
    pub fn with_sequence(&self, lane: &str, sequence: u64) -> Self {
        let mut lanes = self.0.clone();
        lanes.insert(lane.to_string(), sequence);
        Self(lanes)
    }
}

impl FromIterator<(String, u64)> for NonceState {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
