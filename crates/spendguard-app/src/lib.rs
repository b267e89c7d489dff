//! Use case orchestration for spendguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, settings,
//! anchor and render layers. It is intentionally thin and delegates heavy lifting to them.
//!
//! The CLI crate depends on this; it only handles argument parsing and process exit codes.

#![forbid(unsafe_code)]

mod digest;
mod doctor;
mod evaluate;
mod explain;
mod io;
mod policy_text;
mod prove;
mod render;
mod run;
mod verify;

pub use digest::{DigestInput, DigestOutput, run_digest};
pub use doctor::{DoctorReport, format_doctor, run_doctor};
pub use evaluate::{Evaluated, evaluate_intents};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use io::{
    load_config, load_intents, load_ledger, load_policy, load_results, write_json, write_text,
};
pub use policy_text::{PolicyTextOutput, run_policy_from_text};
pub use prove::{ANCHOR_SKIPPED, ProveInput, ProveOutput, run_prove};
pub use render::{batch_markdown, proof_markdown};
pub use run::{RunInput, RunOutput, run_batch};
pub use verify::{
    VerifyLine, VerifyStatus, VerifySummary, format_summary, verify_exit_code, verify_results,
    verify_tx,
};

/// Tool identity recorded in emitted documents.
pub fn tool_meta() -> spendguard_types::ToolMeta {
    spendguard_types::ToolMeta {
        name: "spendguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
