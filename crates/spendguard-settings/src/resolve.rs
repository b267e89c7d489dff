use crate::{model::SpendguardConfigV1, presets};
use anyhow::Context;
use camino::Utf8PathBuf;
use spendguard_domain::DEFAULT_BUCKET_SECONDS;
use std::fmt;
use std::num::NonZeroU64;
use std::time::Duration;

/// Values supplied on the command line or through the environment. These win over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub policy: Option<Utf8PathBuf>,
    pub ledger: Option<Utf8PathBuf>,
    pub intents: Option<Utf8PathBuf>,
    pub out_dir: Option<Utf8PathBuf>,
    pub ts_bucket_seconds: Option<u64>,
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
    /// Hex secp256k1 key that signs anchoring transactions. Never read from the config file.
    pub private_key: Option<String>,
    pub explorer_tx_base: Option<String>,
}

/// A 32-byte hex private key. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKeyHex(String);

impl PrivateKeyHex {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("invalid private key: expected 32 bytes of hex");
        }
        Ok(Self(raw.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKeyHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKeyHex(<redacted>)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub project: String,
    pub policy: Utf8PathBuf,
    pub ledger: Utf8PathBuf,
    pub intents: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,
    pub bucket_seconds: NonZeroU64,
    pub anchor: AnchorSettings,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorSettings {
    pub rpc_url: Option<String>,
    pub chain_id: u64,
    pub private_key: Option<PrivateKeyHex>,
    pub explorer_tx_base: Option<String>,
    pub receipt_timeout: Duration,
    pub poll_interval: Duration,
}

impl AnchorSettings {
    /// Endpoint and signing key, when both are set. Anchoring is skipped otherwise.
    pub fn anchoring(&self) -> Option<(&str, &PrivateKeyHex)> {
        Some((self.rpc_url.as_deref()?, self.private_key.as_ref()?))
    }

    /// Explorer link for `tx_hash`, or the bare hash when no explorer is configured.
    pub fn tx_link(&self, tx_hash: &str) -> String {
        match self.explorer_tx_base.as_deref() {
            Some(base) => format!("{}/{tx_hash}", base.trim_end_matches('/')),
            None => tx_hash.to_string(),
        }
    }
}

pub fn resolve_config(
    cfg: SpendguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let bucket = overrides
        .ts_bucket_seconds
        .or(cfg.ts_bucket_seconds)
        .unwrap_or(DEFAULT_BUCKET_SECONDS);
    let bucket_seconds = NonZeroU64::new(bucket)
        .context("invalid ts_bucket_seconds: must be greater than zero")?;

    let anchor_cfg = cfg.anchor;

    let rpc_url = non_blank(overrides.rpc_url.or(anchor_cfg.rpc_url));
    if let Some(url) = rpc_url.as_deref() {
        validate_rpc_url(url)?;
    }

    let private_key = non_blank(overrides.private_key)
        .map(|key| PrivateKeyHex::parse(&key))
        .transpose()?;

    let poll_ms = anchor_cfg
        .receipt_poll_interval_ms
        .unwrap_or(presets::DEFAULT_RECEIPT_POLL_INTERVAL_MS);
    if poll_ms == 0 {
        anyhow::bail!("invalid anchor.receipt_poll_interval_ms: must be greater than zero");
    }

    let anchor = AnchorSettings {
        rpc_url,
        chain_id: overrides
            .chain_id
            .or(anchor_cfg.chain_id)
            .unwrap_or(presets::DEFAULT_CHAIN_ID),
        private_key,
        explorer_tx_base: non_blank(overrides.explorer_tx_base.or(anchor_cfg.explorer_tx_base)),
        receipt_timeout: Duration::from_millis(
            anchor_cfg
                .receipt_timeout_ms
                .unwrap_or(presets::DEFAULT_RECEIPT_TIMEOUT_MS),
        ),
        poll_interval: Duration::from_millis(poll_ms),
    };

    Ok(ResolvedConfig {
        project: cfg
            .project
            .unwrap_or_else(|| presets::DEFAULT_PROJECT.to_string()),
        policy: path_or(overrides.policy, cfg.policy, presets::DEFAULT_POLICY_PATH),
        ledger: path_or(overrides.ledger, cfg.ledger, presets::DEFAULT_LEDGER_PATH),
        intents: path_or(overrides.intents, cfg.intents, presets::DEFAULT_INTENTS_PATH),
        out_dir: path_or(overrides.out_dir, cfg.out_dir, presets::DEFAULT_OUT_DIR),
        bucket_seconds,
        anchor,
    })
}

fn path_or(over: Option<Utf8PathBuf>, file: Option<String>, default: &str) -> Utf8PathBuf {
    over.or_else(|| file.map(Utf8PathBuf::from))
        .unwrap_or_else(|| Utf8PathBuf::from(default))
}

// `.env` files often carry `KEY=` lines; treat them as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_rpc_url(url: &str) -> anyhow::Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        anyhow::bail!("invalid anchor.rpc_url: {url} (expected http:// or https://)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;

    const KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";

    #[test]
    fn defaults_without_config() {
        let resolved = resolve_config(SpendguardConfigV1::default(), Overrides::default())
            .expect("resolve");
        assert_eq!(resolved.project, "spendguard");
        assert_eq!(resolved.policy, "policy.json");
        assert_eq!(resolved.ledger, "ledger.json");
        assert_eq!(resolved.out_dir, "out");
        assert_eq!(resolved.bucket_seconds.get(), 60);
        assert_eq!(resolved.anchor.chain_id, 42431);
        assert_eq!(resolved.anchor.receipt_timeout, Duration::from_millis(30_000));
        assert_eq!(resolved.anchor.poll_interval, Duration::from_millis(800));
        assert!(resolved.anchor.anchoring().is_none());
    }

    #[test]
    fn overrides_win_over_file() {
        let cfg = parse_config_toml(
            r#"
policy = "cfg/policy.json"
ts_bucket_seconds = 300

[anchor]
rpc_url = "https://file.example"
chain_id = 1
"#,
        )
        .expect("parse toml");

        let resolved = resolve_config(
            cfg,
            Overrides {
                rpc_url: Some("https://flag.example".to_string()),
                private_key: Some(KEY.to_string()),
                ..Overrides::default()
            },
        )
        .expect("resolve");

        assert_eq!(resolved.policy, "cfg/policy.json");
        assert_eq!(resolved.bucket_seconds.get(), 300);
        assert_eq!(
            resolved.anchor.rpc_url.as_deref(),
            Some("https://flag.example")
        );
        assert_eq!(
            resolved.anchor.private_key.as_ref().map(PrivateKeyHex::expose),
            Some(KEY)
        );
        assert_eq!(resolved.anchor.chain_id, 1);
        assert_eq!(
            resolved.anchor.anchoring().map(|(url, _)| url),
            Some("https://flag.example")
        );
    }

    #[test]
    fn zero_bucket_is_rejected() {
        let err = resolve_config(
            SpendguardConfigV1::default(),
            Overrides {
                ts_bucket_seconds: Some(0),
                ..Overrides::default()
            },
        )
        .expect_err("zero bucket");
        assert!(err.to_string().contains("ts_bucket_seconds"));
    }

    #[test]
    fn malformed_private_key_is_rejected() {
        let err = resolve_config(
            SpendguardConfigV1::default(),
            Overrides {
                private_key: Some("0x1234".to_string()),
                ..Overrides::default()
            },
        )
        .expect_err("short key");
        assert!(err.to_string().contains("private key"));
        assert!(!err.to_string().contains("1234"));
    }

    #[test]
    fn private_key_alone_does_not_enable_anchoring() {
        let resolved = resolve_config(
            SpendguardConfigV1::default(),
            Overrides {
                private_key: Some(KEY.trim_start_matches("0x").to_string()),
                ..Overrides::default()
            },
        )
        .expect("resolve");
        assert!(resolved.anchor.private_key.is_some());
        assert!(resolved.anchor.anchoring().is_none());
        assert!(!format!("{resolved:?}").contains("4646"));
    }

    #[test]
    fn blank_values_read_as_unset() {
        let resolved = resolve_config(
            SpendguardConfigV1::default(),
            Overrides {
                rpc_url: Some("  ".to_string()),
                ..Overrides::default()
            },
        )
        .expect("resolve");
        assert_eq!(resolved.anchor.rpc_url, None);
    }

    #[test]
    fn tx_link_joins_without_double_slash() {
        let mut anchor = resolve_config(SpendguardConfigV1::default(), Overrides::default())
            .expect("resolve")
            .anchor;
        assert_eq!(anchor.tx_link("0xabc"), "0xabc");

        anchor.explorer_tx_base = Some("https://explore.example/tx/".to_string());
        assert_eq!(anchor.tx_link("0xabc"), "https://explore.example/tx/0xabc");
    }
}
