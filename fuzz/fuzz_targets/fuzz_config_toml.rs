//! Fuzz target for `spendguard.toml` parsing and resolution.
//!
//! Goal: arbitrary config text either resolves or errors, and never panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_toml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use spendguard_settings::Overrides;

fuzz_target!(|text: &str| {
    if text.len() > 16 * 1024 {
        return;
    }
    let Ok(cfg) = spendguard_settings::parse_config_toml(text) else {
        return;
    };
    if let Ok(resolved) = spendguard_settings::resolve_config(cfg, Overrides::default()) {
        assert!(resolved.bucket_seconds.get() > 0);
        let _ = resolved.anchor.tx_link("0xabc");
    }
});
