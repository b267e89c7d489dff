//! Config parsing, input document validation and policy-from-text.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod documents;
mod model;
mod policy_text;
mod presets;
mod resolve;

pub use documents::{parse_intents_json, parse_ledger_json, parse_policy_json};
pub use model::{AnchorConfig, SpendguardConfigV1};
pub use policy_text::{SOURCE_KIND_NLP_LITE, normalize_text, policy_from_text};
pub use presets::{DEFAULT_CHAIN_ID, default_category_caps, default_daily_budget};
pub use resolve::{AnchorSettings, Overrides, PrivateKeyHex, ResolvedConfig};

/// Parse `spendguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<SpendguardConfigV1> {
    let cfg: SpendguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings (defaults + config file + overrides).
pub fn resolve_config(
    cfg: SpendguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
