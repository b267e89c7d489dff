use anyhow::Context;
use serde_json::Value as JsonValue;
use spendguard_types::{Intent, Ledger, PolicyDocument};

/// Parse and validate a policy document.
///
/// Caps must be finite and non-negative; a `null` cap means uncapped. The parsed JSON is kept
/// next to the typed policy for hashing.
pub fn parse_policy_json(input: &str) -> anyhow::Result<PolicyDocument> {
    let source: JsonValue = serde_json::from_str(input).context("parse policy JSON")?;
    let doc = PolicyDocument::from_value(source).context("parse policy JSON")?;
    let policy = &doc.policy;

    if let Some(budget) = policy.daily_budget {
        validate_cap("daily_budget", budget)?;
    }
    for (category, cap) in &policy.category_caps {
        validate_cap(&format!("category_caps.{category}"), *cap)?;
    }
    Ok(doc)
}

/// Parse an intents document: a JSON array of intents, or a single intent object.
///
/// Individual intents are not validated here; incomplete ones are answered with `block`.
pub fn parse_intents_json(input: &str) -> anyhow::Result<Vec<Intent>> {
    let value: JsonValue = serde_json::from_str(input).context("parse intents JSON")?;
    match value {
        JsonValue::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item).with_context(|| format!("intent #{i} is not an object"))
            })
            .collect(),
        JsonValue::Object(_) => {
            let intent = serde_json::from_value(value).context("parse intent")?;
            Ok(vec![intent])
        }
        _ => anyhow::bail!("intents must be a JSON array or object"),
    }
}

/// Parse a stored ledger. Events with unreadable amounts are tolerated.
pub fn parse_ledger_json(input: &str) -> anyhow::Result<Ledger> {
    serde_json::from_str(input).context("parse ledger JSON")
}

fn validate_cap(name: &str, value: f64) -> anyhow::Result<()> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("invalid policy: {name} must be a non-negative number (got {value})");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_caps_are_rejected() {
        let err = parse_policy_json(r#"{"category_caps": {"food": -1}}"#).expect_err("negative");
        assert!(format!("{err:#}").contains("category_caps.food"));

        let err = parse_policy_json(r#"{"daily_budget": -0.5}"#).expect_err("negative");
        assert!(format!("{err:#}").contains("daily_budget"));
    }

    #[test]
    fn valid_policy_parses() {
        let doc = parse_policy_json(
            r#"{"version": "v2", "daily_budget_usdc": 0, "category_caps_usdc": {"food": 12.5}}"#,
        )
        .expect("policy");
        assert_eq!(doc.policy.version(), "v2");
        assert_eq!(doc.policy.daily_budget, Some(0.0));
        assert_eq!(doc.policy.category_cap("food"), Some(12.5));
        assert_eq!(doc.source["category_caps_usdc"]["food"], 12.5);
    }

    #[test]
    fn null_caps_are_uncapped_not_errors() {
        let doc = parse_policy_json(r#"{"daily_budget": 15, "category_caps": {"food": null}}"#)
            .expect("null category cap");
        assert_eq!(doc.policy.daily_budget, Some(15.0));
        assert_eq!(doc.policy.category_cap("food"), None);
        assert_eq!(doc.source["category_caps"]["food"], JsonValue::Null);

        let doc = parse_policy_json(r#"{"daily_budget": null, "category_caps": null}"#)
            .expect("null caps");
        assert_eq!(doc.policy.daily_budget, None);
        assert!(doc.policy.category_caps.is_empty());
    }

    #[test]
    fn intents_accept_array_or_single_object() {
        let many = parse_intents_json(
            r#"[{"date": "2024-01-01", "category": "food", "amount": 1}, {"category": "food"}]"#,
        )
        .expect("array");
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].date, None);

        let one = parse_intents_json(r#"{"date": "2024-01-01", "category": "food", "amount": 1}"#)
            .expect("object");
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn scalar_intents_document_is_an_error() {
        assert!(parse_intents_json("42").is_err());
        assert!(parse_intents_json("[1]").is_err());
    }

    #[test]
    fn ledger_parses_with_defaults() {
        let ledger = parse_ledger_json("{}").expect("ledger");
        assert!(ledger.events.is_empty());
        assert_eq!(ledger.nonce_state, spendguard_types::NonceState::new());
    }
}
