//! Fuzz target for intent and ledger documents flowing through the evaluator.
//!
//! Goal: any documents that parse can be evaluated and digested without panicking.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_intents_ledger
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spendguard_types::{Policy, PolicyDocument};
use std::num::NonZeroU64;

#[derive(Arbitrary, Debug)]
struct Documents {
    intents: String,
    ledger: String,
    now_secs: u64,
    bucket_seconds: u16,
}

fuzz_target!(|input: Documents| {
    if input.intents.len() > 16 * 1024 || input.ledger.len() > 16 * 1024 {
        return;
    }
    let Ok(intents) = spendguard_settings::parse_intents_json(&input.intents) else {
        return;
    };
    let mut ledger = spendguard_settings::parse_ledger_json(&input.ledger).unwrap_or_default();
    let bucket = NonZeroU64::new(u64::from(input.bucket_seconds)).unwrap_or(NonZeroU64::MIN);
    let Ok(policy) = PolicyDocument::from_policy(Policy::default()) else {
        return;
    };

    for intent in intents.iter().take(64) {
        let decision = spendguard_domain::decide(&policy.policy, intent, &ledger);
        let _ = spendguard_domain::decision_digest(
            &spendguard_domain::DigestInput::from_decision(&policy, intent, &decision),
            input.now_secs,
            bucket,
        );
        ledger = spendguard_domain::apply(&ledger, intent, &decision, None);
    }
});
