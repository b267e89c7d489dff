use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `spendguard.toml` schema v1.
///
/// Every field is optional; the resolver fills in defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpendguardConfigV1 {
    /// Optional schema string for tooling (`spendguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Project label echoed into batch output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Path to the policy document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// Path to the ledger document. A missing file is read as an empty ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<String>,

    /// Path to the intents document (array of intents).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<String>,

    /// Where `prove` writes `results.json` and `report.md`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,

    /// Width of the digest time bucket. Must be positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_bucket_seconds: Option<u64>,

    #[serde(default)]
    pub anchor: AnchorConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnchorConfig {
    /// JSON-RPC endpoint of the anchoring network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,

    /// Explorer URL prefix for transaction links, e.g. `https://explore.example/tx`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_tx_base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_poll_interval_ms: Option<u64>,
}
