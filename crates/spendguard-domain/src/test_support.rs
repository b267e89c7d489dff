use spendguard_types::{Ledger, LedgerEvent, Policy, PolicyDocument};
use std::collections::BTreeMap;
use std::num::NonZeroU64;

/// `{daily_budget: 15, category_caps: {food: 12}, blocked_merchants: ["scam-mart"], lane_by: "category"}`
pub fn scenario_policy() -> Policy {
    Policy {
        daily_budget: Some(15.0),
        category_caps: BTreeMap::from([("food".to_string(), 12.0)]),
        blocked_merchants: vec!["scam-mart".to_string()],
        lane_by: Some("category".to_string()),
        ..Policy::default()
    }
}

pub fn document(policy: &Policy) -> PolicyDocument {
    PolicyDocument::from_policy(policy.clone()).expect("serialize policy")
}

pub fn event(date: &str, category: &str, amount: Option<f64>) -> LedgerEvent {
    LedgerEvent {
        date: date.to_string(),
        category: category.to_string(),
        amount,
        ..LedgerEvent::default()
    }
}

pub fn ledger_with(events: Vec<LedgerEvent>) -> Ledger {
    Ledger {
        events,
        ..Ledger::default()
    }
}

pub fn minute() -> NonZeroU64 {
    NonZeroU64::new(60).expect("non-zero")
}
