use std::collections::BTreeMap;

/// Chain the anchoring collaborator talks to unless configured otherwise.
pub const DEFAULT_CHAIN_ID: u64 = 42431;

pub(crate) const DEFAULT_PROJECT: &str = "spendguard";
pub(crate) const DEFAULT_POLICY_PATH: &str = "policy.json";
pub(crate) const DEFAULT_LEDGER_PATH: &str = "ledger.json";
pub(crate) const DEFAULT_INTENTS_PATH: &str = "intents.json";
pub(crate) const DEFAULT_OUT_DIR: &str = "out";
pub(crate) const DEFAULT_RECEIPT_TIMEOUT_MS: u64 = 30_000;
pub(crate) const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 800;

/// Daily budget used by policy-from-text when the text names none.
pub fn default_daily_budget() -> f64 {
    15.0
}

/// Category caps used by policy-from-text when the text names none.
pub fn default_category_caps() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("food".to_string(), 12.0),
        ("transport".to_string(), 10.0),
    ])
}
