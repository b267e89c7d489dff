//! Fuzz target for policy document parsing and hashing.
//!
//! Goal: parsing arbitrary bytes **never panics**, and any accepted policy hashes twice to
//! the same value.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_json
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(policy) = spendguard_settings::parse_policy_json(text) else {
        return;
    };

    let first = spendguard_domain::policy_hash(&policy.source);
    let second = spendguard_domain::policy_hash(&policy.source);
    if let (Ok(a), Ok(b)) = (first, second) {
        assert_eq!(a, b, "policy hash must be deterministic");
    }
});
