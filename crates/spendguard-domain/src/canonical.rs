//! Canonical JSON: the hash preimage for policy hashes and decision digests.
//!
//! Mappings are re-emitted in sorted key order, sequences keep their order, and
//! integral floating values collapse to integer form so `10.0` and `10` hash alike.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value as JsonValue};
use std::collections::BTreeMap;

/// Largest magnitude below which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, PartialEq)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<CanonicalValue>),
    Mapping(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    /// Compact JSON bytes, the exact hash preimage.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn get(&self, key: &str) -> Option<&CanonicalValue> {
        match self {
            CanonicalValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<&JsonValue> for CanonicalValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => CanonicalValue::Null,
            JsonValue::Bool(b) => CanonicalValue::Bool(*b),
            JsonValue::Number(n) => CanonicalValue::Number(normalize_number(n)),
            JsonValue::String(s) => CanonicalValue::String(s.clone()),
            JsonValue::Array(items) => {
                CanonicalValue::Sequence(items.iter().map(CanonicalValue::from).collect())
            }
            JsonValue::Object(map) => CanonicalValue::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), CanonicalValue::from(v)))
                    .collect(),
            ),
        }
    }
}

fn normalize_number(n: &Number) -> Number {
    if n.is_i64() || n.is_u64() {
        return n.clone();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            if f >= 0.0 {
                Number::from(f as u64)
            } else {
                Number::from(f as i64)
            }
        }
        _ => n.clone(),
    }
}

impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CanonicalValue::Null => serializer.serialize_unit(),
            CanonicalValue::Bool(b) => serializer.serialize_bool(*b),
            CanonicalValue::Number(n) => n.serialize(serializer),
            CanonicalValue::String(s) => serializer.serialize_str(s),
            CanonicalValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            CanonicalValue::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}
