//! The `digest` use case: re-derive one decision digest without anchoring.

use anyhow::Context;
use serde::Serialize;
use spendguard_domain::CanonicalValue;
use spendguard_types::{Decision, Intent, Ledger, PolicyDocument};
use std::num::NonZeroU64;

pub struct DigestInput<'a> {
    pub policy: &'a PolicyDocument,
    pub intent: &'a Intent,
    pub ledger: &'a Ledger,
    /// Unix seconds. Pin this to reproduce a digest from an earlier bucket.
    pub now_secs: u64,
    pub bucket_seconds: NonZeroU64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DigestOutput {
    pub decision: Decision,
    pub decision_digest: String,
    pub policy_hash: String,
    pub ts_bucket: u64,
    pub payload: CanonicalValue,
}

pub fn run_digest(input: DigestInput<'_>) -> anyhow::Result<DigestOutput> {
    let decision = spendguard_domain::decide(&input.policy.policy, input.intent, input.ledger);
    let digest = spendguard_domain::decision_digest(
        &spendguard_domain::DigestInput::from_decision(input.policy, input.intent, &decision),
        input.now_secs,
        input.bucket_seconds,
    )
    .context("compute decision digest")?;

    Ok(DigestOutput {
        decision,
        decision_digest: digest.digest_hex,
        policy_hash: digest.policy_hash,
        ts_bucket: digest.bucket,
        payload: digest.payload,
    })
}
