//! The `policy-from-text` use case.

use anyhow::Context;
use spendguard_types::{Policy, PolicyDocument};

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyTextOutput {
    pub policy: Policy,
    pub policy_hash: String,
}

pub fn run_policy_from_text(text: &str) -> anyhow::Result<PolicyTextOutput> {
    let policy = spendguard_settings::policy_from_text(text).context("parse policy text")?;
    // The written file is this serialization, so hashing it matches a later `load_policy`.
    let doc = PolicyDocument::from_policy(policy).context("serialize policy")?;
    let policy_hash = spendguard_domain::policy_hash(&doc.source).context("hash policy")?;
    Ok(PolicyTextOutput {
        policy: doc.policy,
        policy_hash,
    })
}
