use serde_json::Value as JsonValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableOutcome {
    Approve,
    Deny,
    Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableDecision {
    pub outcome: RenderableOutcome,
    pub intent: JsonValue,
    pub reasons: Vec<String>,
    pub lane: String,
    pub sequence: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableBatch {
    pub project: String,
    pub decisions: Vec<RenderableDecision>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderableProof {
    Anchored {
        tx_hash: String,
        tx_link: String,
        /// Whether a receipt arrived before the polling timeout.
        confirmed: bool,
        status: Option<String>,
        block: Option<u64>,
    },
    NotAnchored {
        error: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableCase {
    pub decision: RenderableDecision,
    pub decision_digest: String,
    pub policy_hash: String,
    pub ts_bucket: u64,
    pub proof: RenderableProof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableProofReport {
    pub chain_id: Option<u64>,
    /// RFC 3339, preformatted by the caller.
    pub generated_at: String,
    pub cases: Vec<RenderableCase>,
}
