use crate::decision::Decision;
use crate::intent::Intent;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifiers for spendguard documents.
pub const SCHEMA_RESULTS_V1: &str = "spendguard.results.v1";
pub const SCHEMA_POLICY_V1: &str = "spendguard.policy.v1";
pub const SCHEMA_INTENT_V1: &str = "spendguard.intent.v1";
pub const SCHEMA_LEDGER_V1: &str = "spendguard.ledger.v1";
pub const SCHEMA_CONFIG_V1: &str = "spendguard.config.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Outcome of handing a digest to the anchoring collaborator.
///
/// Either `anchored: true` with the chain fields, or `anchored: false` with `error`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnchorProof {
    pub anchored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_link: Option<String>,
    /// `false` when the transaction was sent but no receipt arrived before the timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    /// Raw receipt status quantity (`0x1` on success), absent when the receipt never arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnchorProof {
    pub fn anchored(
        chain_id: u64,
        tx_hash: String,
        tx_link: String,
        confirmed: bool,
        status: Option<String>,
        block: Option<u64>,
    ) -> Self {
        Self {
            anchored: true,
            chain_id: Some(chain_id),
            tx_hash: Some(tx_hash),
            tx_link: Some(tx_link),
            confirmed: Some(confirmed),
            status,
            block,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            anchored: false,
            chain_id: None,
            tx_hash: None,
            tx_link: None,
            confirmed: None,
            status: None,
            block: None,
            error: Some(error.into()),
        }
    }
}

/// One line of `spendguard run` output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionRecord {
    pub intent: Intent,
    pub decision: Decision,
}

/// Output of `spendguard run`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchEnvelope {
    pub project: String,
    pub version: String,
    pub out: Vec<DecisionRecord>,
}

/// One evaluated intent with its digest and anchoring proof.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProofRecord {
    pub intent: Intent,
    pub decision: Decision,
    pub decision_digest: String,
    pub policy_hash: String,
    pub ts_bucket: u64,
    pub proof: AnchorProof,
}

/// `results.json` written by `spendguard prove`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResultsEnvelope {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub results: Vec<ProofRecord>,
}
