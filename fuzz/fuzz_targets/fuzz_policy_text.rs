//! Fuzz target for the free-text policy parser.
//!
//! Goal: the tokenizer **never panics** on arbitrary UTF-8 (multi-byte boundaries included),
//! and every policy it builds has finite, non-negative caps.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_text
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    if text.len() > 4096 {
        return;
    }
    let Ok(policy) = spendguard_settings::policy_from_text(text) else {
        return;
    };

    if let Some(daily) = policy.daily_budget {
        assert!(daily.is_finite() && daily >= 0.0);
    }
    for cap in policy.category_caps.values() {
        assert!(cap.is_finite() && *cap >= 0.0);
    }
    assert_eq!(policy.lane_by.as_deref(), Some("category"));
});
