//! Shared test utilities for the spendguard workspace.
//!
//! Lives outside `#[cfg(test)]` so the CLI integration tests and the BDD runner can both use it.

use serde_json::Value;

pub const TIMESTAMP: &str = "__TIMESTAMP__";
pub const VERSION: &str = "__VERSION__";
pub const DIGEST: &str = "__DIGEST__";

/// Normalize wall-clock dependent JSON fields for golden comparison.
///
/// 1. **Root-only**: `tool.version` and `generated_at` when the root is a results envelope
///    (`schema`, `tool`, `generated_at`, `results`).
/// 2. **Recursive**: ledger `ts` and proof `ts_bucket` become placeholders, and so does
///    `decision_digest`, which hashes the bucket. `policy_hash` is left alone.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = obj.contains_key("schema")
            && obj.contains_key("tool")
            && obj.contains_key("generated_at")
            && obj.contains_key("results");
        if is_envelope {
            obj.insert("generated_at".to_string(), Value::String(TIMESTAMP.to_string()));
            if let Some(tool) = obj.get_mut("tool")
                && let Some(tool_obj) = tool.as_object_mut()
                && tool_obj.contains_key("version")
            {
                tool_obj.insert("version".to_string(), Value::String(VERSION.to_string()));
            }
        }
    }
    normalize_recursive(&mut value);
    value
}

fn normalize_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("ts").is_some_and(Value::is_string) {
                map.insert("ts".to_string(), Value::String(TIMESTAMP.to_string()));
            }
            if map.contains_key("ts_bucket") {
                map.insert("ts_bucket".to_string(), Value::Number(0.into()));
            }
            if map.contains_key("decision_digest") {
                map.insert(
                    "decision_digest".to_string(),
                    Value::String(DIGEST.to_string()),
                );
            }
            for val in map.values_mut() {
                normalize_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_fields_are_normalized() {
        let value = json!({
            "schema": "spendguard.results.v1",
            "tool": {"name": "spendguard", "version": "0.1.0"},
            "generated_at": "2024-01-01T00:00:00Z",
            "results": [{
                "decision_digest": "0xabc",
                "policy_hash": "0xdef",
                "ts_bucket": 1_699_999_980u64
            }]
        });

        let normalized = normalize_nondeterministic(value);
        assert_eq!(normalized["tool"]["version"], VERSION);
        assert_eq!(normalized["generated_at"], TIMESTAMP);
        assert_eq!(normalized["results"][0]["decision_digest"], DIGEST);
        assert_eq!(normalized["results"][0]["ts_bucket"], 0);
        assert_eq!(normalized["results"][0]["policy_hash"], "0xdef");
    }

    #[test]
    fn ledger_timestamps_are_normalized_outside_envelopes() {
        let value = json!({
            "events": [{"date": "2024-01-01", "ts": "2024-01-01T00:00:03Z", "amount": 1}],
            "tool": {"name": "x", "version": "1"}
        });

        let normalized = normalize_nondeterministic(value);
        assert_eq!(normalized["events"][0]["ts"], TIMESTAMP);
        assert_eq!(normalized["tool"]["version"], "1");
    }
}
