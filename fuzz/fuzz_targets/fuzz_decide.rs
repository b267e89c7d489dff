//! Structured fuzz target for the decision engine.
//!
//! Goals:
//! - the same inputs always produce the same decision
//! - committed spend never exceeds the daily budget or a category cap
//! - lanes hand out consecutive sequence numbers
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_decide
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spendguard_types::{Intent, Ledger, Outcome, Policy};
use std::collections::{BTreeMap, HashMap};

const CATEGORIES: [&str; 3] = ["food", "transport", "fun"];
const MERCHANTS: [&str; 3] = ["deli", "bus", "scam-mart"];

#[derive(Arbitrary, Debug)]
struct Step {
    category: u8,
    merchant: u8,
    /// Cents, so amounts stay exactly representable.
    cents: u16,
}

#[derive(Arbitrary, Debug)]
struct Run {
    daily_cents: u16,
    food_cents: u16,
    steps: Vec<Step>,
}

fuzz_target!(|run: Run| {
    if run.steps.len() > 64 {
        return;
    }
    let daily = f64::from(run.daily_cents) / 100.0;
    let food = f64::from(run.food_cents) / 100.0;
    let policy = Policy {
        daily_budget: Some(daily),
        category_caps: BTreeMap::from([("food".to_string(), food)]),
        blocked_merchants: vec!["scam-mart".to_string()],
        lane_by: Some("category".to_string()),
        ..Policy::default()
    };

    let mut ledger = Ledger::default();
    let mut last_seq: HashMap<String, u64> = HashMap::new();

    for step in &run.steps {
        let category = CATEGORIES[usize::from(step.category) % CATEGORIES.len()];
        let merchant = MERCHANTS[usize::from(step.merchant) % MERCHANTS.len()];
        let intent = Intent::new(
            "2024-01-01",
            category,
            f64::from(step.cents) / 100.0,
            Some(merchant),
        );

        let decision = spendguard_domain::decide(&policy, &intent, &ledger);
        assert_eq!(decision, spendguard_domain::decide(&policy, &intent, &ledger));
        assert_ne!(decision.outcome, Outcome::Block);

        let previous = last_seq.insert(category.to_string(), decision.nonce.sequence);
        assert_eq!(decision.nonce.sequence, previous.unwrap_or(0) + 1);

        ledger = spendguard_domain::apply(&ledger, &intent, &decision, None);
    }

    let total: f64 = ledger.events.iter().filter_map(|e| e.amount).sum();
    let food_total: f64 = ledger
        .events
        .iter()
        .filter(|e| e.category == "food")
        .filter_map(|e| e.amount)
        .sum();
    assert!(total <= daily + 1e-9);
    assert!(food_total <= food + 1e-9);
});
