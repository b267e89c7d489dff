//! Stable DTOs and IDs used across the spendguard workspace.
//!
//! This crate is intentionally boring:
//! - the policy, intent and ledger documents callers hand in
//! - the decision and proof records the tool emits
//! - stable string IDs for reason checks and codes
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod decision;
pub mod explain;
pub mod ids;
pub mod intent;
pub mod ledger;
pub mod policy;
pub mod receipt;

pub use decision::{Constraints, Decision, Nonce2d, Outcome};
pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use intent::Intent;
pub use ledger::{Ledger, LedgerEvent, NonceState};
pub use policy::{LaneBy, Policy, PolicyDocument};
pub use receipt::{
    AnchorProof, BatchEnvelope, DecisionRecord, ProofRecord, ResultsEnvelope, SCHEMA_CONFIG_V1,
    SCHEMA_INTENT_V1, SCHEMA_LEDGER_V1, SCHEMA_POLICY_V1, SCHEMA_RESULTS_V1, ToolMeta,
};
