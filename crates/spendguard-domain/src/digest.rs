use crate::canonical::CanonicalValue;
use serde_json::json;
use sha2::{Digest, Sha256};
use serde_json::Value as JsonValue;
use spendguard_types::{Constraints, Decision, Intent, Nonce2d, Outcome, PolicyDocument};
use std::num::NonZeroU64;
use thiserror::Error;

/// Default width of the digest time bucket, in seconds.
pub const DEFAULT_BUCKET_SECONDS: u64 = 60;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("failed to canonicalize {what}")]
    Canonicalize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a decision digest commits to, apart from the clock.
#[derive(Clone, Copy, Debug)]
pub struct DigestInput<'a> {
    pub policy: &'a PolicyDocument,
    pub intent: &'a Intent,
    pub outcome: Outcome,
    pub constraints: Option<&'a Constraints>,
    pub nonce: &'a Nonce2d,
}

impl<'a> DigestInput<'a> {
    pub fn from_decision(
        policy: &'a PolicyDocument,
        intent: &'a Intent,
        decision: &'a Decision,
    ) -> Self {
        Self {
            policy,
            intent,
            outcome: decision.outcome,
            constraints: decision.constraints.as_ref(),
            nonce: &decision.nonce,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecisionDigest {
    /// `0x` followed by 64 lowercase hex digits.
    pub digest_hex: String,
    pub policy_hash: String,
    /// The canonical payload that was hashed.
    pub payload: CanonicalValue,
    pub bucket: u64,
}

/// Start of the bucket containing `now_secs`.
pub fn time_bucket(now_secs: u64, bucket_seconds: NonZeroU64) -> u64 {
    let width = bucket_seconds.get();
    now_secs / width * width
}

/// SHA-256 over the canonical form of the policy document as it was read.
pub fn policy_hash(document: &JsonValue) -> Result<String, DigestError> {
    hash_canonical(&CanonicalValue::from(document), "policy")
}

/// Digest of one decision, bucketed by `now_secs`.
///
/// Identical inputs within the same bucket always produce the same digest.
pub fn decision_digest(
    input: &DigestInput<'_>,
    now_secs: u64,
    bucket_seconds: NonZeroU64,
) -> Result<DecisionDigest, DigestError> {
    let bucket = time_bucket(now_secs, bucket_seconds);
    let policy_hash = policy_hash(&input.policy.source)?;

    let intent = to_json(input.intent, "intent")?;
    let constraints = to_json(&input.constraints, "constraints")?;
    let nonce = to_json(input.nonce, "nonce")?;

    let payload = CanonicalValue::from(&json!({
        "policy_version": input.policy.policy.version(),
        "policy_hash": policy_hash,
        "intent": intent,
        "decision": input.outcome.as_str(),
        "constraints": constraints,
        "nonce": nonce,
        "ts_bucket": bucket,
    }));
    let digest_hex = hash_canonical(&payload, "decision payload")?;

    Ok(DecisionDigest {
        digest_hex,
        policy_hash,
        payload,
        bucket,
    })
}

fn to_json<T: serde::Serialize + ?Sized>(
    value: &T,
    what: &'static str,
) -> Result<serde_json::Value, DigestError> {
    serde_json::to_value(value).map_err(|source| DigestError::Canonicalize { what, source })
}

fn hash_canonical(value: &CanonicalValue, what: &'static str) -> Result<String, DigestError> {
    let bytes = value
        .to_json_bytes()
        .map_err(|source| DigestError::Canonicalize { what, source })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();
    Ok(format!("0x{}", hex::encode(digest)))
}
