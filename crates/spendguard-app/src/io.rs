//! File boundary: everything that touches the filesystem lives here.

use anyhow::Context;
use camino::Utf8Path;
use serde::Serialize;
use spendguard_settings::SpendguardConfigV1;
use spendguard_types::{Intent, Ledger, PolicyDocument, ResultsEnvelope};
use std::io::ErrorKind;
use tracing::debug;

fn read_optional(path: &Utf8Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read {path}")),
    }
}

fn read_required(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {path}"))
}

/// Load `spendguard.toml`. A missing file means defaults.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<SpendguardConfigV1> {
    match read_optional(path)? {
        Some(text) if !text.trim().is_empty() => spendguard_settings::parse_config_toml(&text)
            .with_context(|| format!("parse config {path}")),
        _ => {
            debug!(%path, "no config file, using defaults");
            Ok(SpendguardConfigV1::default())
        }
    }
}

/// Load the policy together with its source document, which the policy hash covers.
pub fn load_policy(path: &Utf8Path) -> anyhow::Result<PolicyDocument> {
    let text = read_required(path)?;
    spendguard_settings::parse_policy_json(&text).with_context(|| format!("load policy {path}"))
}

pub fn load_intents(path: &Utf8Path) -> anyhow::Result<Vec<Intent>> {
    let text = read_required(path)?;
    spendguard_settings::parse_intents_json(&text).with_context(|| format!("load intents {path}"))
}

/// Load the ledger. A missing file is an empty ledger.
pub fn load_ledger(path: &Utf8Path) -> anyhow::Result<Ledger> {
    match read_optional(path)? {
        Some(text) => spendguard_settings::parse_ledger_json(&text)
            .with_context(|| format!("load ledger {path}")),
        None => {
            debug!(%path, "ledger not found, starting empty");
            Ok(Ledger::default())
        }
    }
}

pub fn load_results(path: &Utf8Path) -> anyhow::Result<ResultsEnvelope> {
    let text = read_required(path)?;
    serde_json::from_str(&text).with_context(|| format!("parse results {path}"))
}

/// Write pretty JSON with a trailing newline, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Utf8Path, value: &T) -> anyhow::Result<()> {
    let mut text = serde_json::to_string_pretty(value).context("serialize JSON")?;
    text.push('\n');
    write_text(path, &text)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}
