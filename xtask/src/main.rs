//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Generated schema documents, keyed by schema ID.
const SCHEMAS: [(&str, fn() -> schemars::Schema); 5] = [
    ("spendguard.policy.v1", || schema_for!(spendguard_types::Policy)),
    ("spendguard.intent.v1", || schema_for!(spendguard_types::Intent)),
    ("spendguard.ledger.v1", || schema_for!(spendguard_types::Ledger)),
    ("spendguard.results.v1", || {
        schema_for!(spendguard_types::ResultsEnvelope)
    }),
    ("spendguard.config.v1", || {
        schema_for!(spendguard_settings::SpendguardConfigV1)
    }),
];

/// Every schema as `(path under schemas/, pretty JSON with trailing newline)`.
fn rendered_schemas() -> anyhow::Result<Vec<(PathBuf, String)>> {
    let dir = schemas_dir();
    SCHEMAS
        .iter()
        .map(|(id, generate)| {
            let mut json = serde_json::to_string_pretty(&generate())
                .with_context(|| format!("serialize {id}"))?;
            json.push('\n');
            Ok((dir.join(format!("{id}.json")), json))
        })
        .collect()
}

fn emit_schemas() -> anyhow::Result<()> {
    fs::create_dir_all(schemas_dir()).context("Failed to create schemas directory")?;
    for (path, json) in rendered_schemas()? {
        fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fail when a committed schema is missing or differs from the generated one.
fn validate_schemas() -> anyhow::Result<()> {
    let mut stale = Vec::new();
    for (path, expected) in rendered_schemas()? {
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", path.display())),
            Err(_) => stale.push(format!("{} (missing)", path.display())),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for entry in &stale {
        eprintln!("  - {entry}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("{} schema(s) need regenerating", stale.len())
}

fn compile(schema: &schemars::Schema) -> anyhow::Result<jsonschema::Validator> {
    let value = serde_json::to_value(schema).context("Failed to convert schema")?;
    jsonschema::validator_for(&value).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

/// Validate the scenario fixtures against freshly generated schemas.
fn conform() -> anyhow::Result<()> {
    let policy = compile(&schema_for!(spendguard_types::Policy))?;
    let intent = compile(&schema_for!(spendguard_types::Intent))?;

    let scenario = fixtures_dir().join("scenario");
    let mut errors = Vec::new();
    let mut checked = 0;

    for entry in fs::read_dir(&scenario)
        .with_context(|| format!("Failed to read {}", scenario.display()))?
    {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", filename))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", filename))?;

        let (validator, documents) = if filename.starts_with("policy") {
            (&policy, vec![value])
        } else if filename.starts_with("intent") {
            match value {
                serde_json::Value::Array(items) => (&intent, items),
                single => (&intent, vec![single]),
            }
        } else {
            continue;
        };

        for (i, document) in documents.iter().enumerate() {
            for err in validator.iter_errors(document) {
                errors.push(format!("{filename}[{i}]: {err}"));
            }
        }
        checked += 1;
        println!("✓ {filename}");
    }

    if errors.is_empty() {
        println!("\n✓ {checked} fixtures conform");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Fixture conformance failed with {} errors", errors.len())
    }
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let check_ids = spendguard_types::explain::all_check_ids();
    let codes = spendguard_types::explain::all_codes();

    let mut errors = Vec::new();
    for (kind, ids) in [("Check ID", check_ids), ("Code", codes)] {
        for id in ids {
            let Some(exp) = spendguard_types::explain::lookup_explanation(id) else {
                errors.push(format!("{kind} '{id}' has no explanation"));
                continue;
            };
            for (field, text) in [
                ("title", exp.title),
                ("description", exp.description),
                ("remediation", exp.remediation),
                ("before example", exp.examples.before),
                ("after example", exp.examples.after),
            ] {
                if text.trim().is_empty() {
                    errors.push(format!("{kind} '{id}' has empty {field}"));
                }
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate tests/fixtures against the generated schemas");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            SCHEMAS.iter().for_each(|(id, _)| println!("{id}"));
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
