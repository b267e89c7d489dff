//! Pure spend policy evaluation (no IO).
//!
//! Input: a policy, an intent and a ledger snapshot constructed elsewhere.
//! Output: a decision, a successor ledger, and a reproducible decision digest.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod canonical;
pub mod digest;
pub mod ledger;
pub mod model;
pub mod nonce;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use canonical::CanonicalValue;
pub use digest::{
    DEFAULT_BUCKET_SECONDS, DecisionDigest, DigestError, DigestInput, decision_digest,
    policy_hash, time_bucket,
};
pub use engine::decide;
pub use ledger::{CommitError, apply, commit, record_allocation};
