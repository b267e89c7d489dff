use crate::ids;
use crate::ledger::NonceState;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of one evaluation. Kept to three values on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Approve,
    Deny,
    Block,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Approve => "approve",
            Outcome::Deny => "deny",
            Outcome::Block => "block",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-dimensional nonce: a lane plus a sequence that is monotonic within that lane.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Nonce2d {
    pub lane: String,
    #[serde(alias = "seq")]
    pub sequence: u64,
}

impl Nonce2d {
    pub fn new(lane: impl Into<String>, sequence: u64) -> Self {
        Self {
            lane: lane.into(),
            sequence,
        }
    }

    /// Returned for blocked intents, which never consume a sequence slot.
    pub fn placeholder() -> Self {
        Self::new(ids::DEFAULT_LANE, 0)
    }
}

/// Budget headroom recorded on approval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Constraints {
    pub max_amount: f64,
    /// `None` when the policy has no daily cap.
    pub remaining_daily: Option<f64>,
    /// `None` when the intent's category has no cap.
    pub remaining_category: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    pub outcome: Outcome,
    pub reasons: Vec<String>,

    /// Stable reason codes, parallel to `reasons` for deny and block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,

    pub nonce: Nonce2d,

    /// Allocator state after this decision; persist it even when nothing is committed.
    pub nonce_state_after: NonceState,
}
