//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Decision determinism
//! - Per-lane nonce monotonicity across approvals and denials
//! - Cap boundaries
//! - Policy hash independence from the key order of the source text

use crate::digest::{DigestInput, decision_digest, policy_hash};
use crate::engine::decide;
use crate::ledger::apply;
use crate::test_support::{document, event, ledger_with, minute, scenario_policy};
use proptest::prelude::*;
use spendguard_types::{Intent, Ledger, Outcome, Policy, PolicyDocument};
use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

fn arb_category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("food".to_string()),
        Just("transport".to_string()),
        Just("books".to_string()),
    ]
}

fn arb_merchant() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("deli".to_string())),
        Just(Some("scam-mart".to_string())),
    ]
}

/// Whole and half units keep sums exact in binary floating point.
fn arb_amount() -> impl Strategy<Value = f64> {
    (0u32..40).prop_map(|halves| f64::from(halves) / 2.0)
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    (
        prop_oneof![Just("2024-01-01"), Just("2024-01-02")],
        arb_category(),
        arb_amount(),
        arb_merchant(),
    )
        .prop_map(|(date, category, amount, merchant)| {
            Intent::new(date, &category, amount, merchant.as_deref())
        })
}

fn arb_caps() -> impl Strategy<Value = BTreeMap<String, f64>> {
    prop::collection::btree_map(arb_category(), (0u32..30).prop_map(f64::from), 0..3)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn decide_is_deterministic(intent in arb_intent(), caps in arb_caps()) {
        let policy = Policy { category_caps: caps, ..scenario_policy() };
        let doc = document(&policy);
        let ledger = ledger_with(vec![event("2024-01-01", "food", Some(3.0))]);

        let a = decide(&policy, &intent, &ledger);
        let b = decide(&policy, &intent, &ledger);
        prop_assert_eq!(&a, &b);

        let da = decision_digest(&DigestInput::from_decision(&doc, &intent, &a), 1_700_000_000, minute())
            .expect("digest");
        let db = decision_digest(&DigestInput::from_decision(&doc, &intent, &b), 1_700_000_000, minute())
            .expect("digest");
        prop_assert_eq!(da.digest_hex, db.digest_hex);
    }

    #[test]
    fn lanes_issue_one_through_n_without_gaps(intents in prop::collection::vec(arb_intent(), 1..25)) {
        let policy = scenario_policy();
        let mut ledger = Ledger::default();
        let mut issued: BTreeMap<String, Vec<u64>> = BTreeMap::new();

        for intent in &intents {
            let decision = decide(&policy, intent, &ledger);
            prop_assert_ne!(decision.outcome, Outcome::Block);
            issued
                .entry(decision.nonce.lane.clone())
                .or_default()
                .push(decision.nonce.sequence);
            ledger = apply(&ledger, intent, &decision, None);
        }

        for (lane, sequences) in issued {
            let expected: Vec<u64> = (1..=sequences.len() as u64).collect();
            prop_assert_eq!(&sequences, &expected, "lane {}", lane);
            prop_assert_eq!(ledger.nonce_state.current(&lane), sequences.len() as u64);
        }
    }

    #[test]
    fn committed_spend_never_exceeds_caps(intents in prop::collection::vec(arb_intent(), 1..25)) {
        let policy = scenario_policy();
        let mut ledger = Ledger::default();
        for intent in &intents {
            let decision = decide(&policy, intent, &ledger);
            ledger = apply(&ledger, intent, &decision, None);
        }

        for date in ["2024-01-01", "2024-01-02"] {
            let day: f64 = crate::aggregate::spent_on(&ledger, date, None);
            let food: f64 = crate::aggregate::spent_on(&ledger, date, Some("food"));
            prop_assert!(day <= 15.0);
            prop_assert!(food <= 12.0);
        }
        prop_assert!(ledger.events.iter().all(|e| e.merchant != "scam-mart"));
    }

    #[test]
    fn boundary_approves_and_excess_denies(spent in 0u32..20, headroom in 0u32..20) {
        let spent = f64::from(spent);
        let amount = f64::from(headroom);
        let cap = spent + amount;
        let policy = Policy { daily_budget: Some(cap), ..Policy::default() };
        let ledger = ledger_with(vec![event("2024-01-01", "misc", Some(spent))]);

        let at_cap = decide(&policy, &Intent::new("2024-01-01", "misc", amount, None), &ledger);
        prop_assert_eq!(at_cap.outcome, Outcome::Approve);

        let over = decide(&policy, &Intent::new("2024-01-01", "misc", amount + 0.5, None), &ledger);
        prop_assert_eq!(over.outcome, Outcome::Deny);
    }

    #[test]
    fn policy_hash_ignores_key_order_of_the_text(
        caps in arb_caps(),
        budget in 0u32..100,
        order in Just(vec![0usize, 1, 2]).prop_shuffle(),
    ) {
        let cap_entries: Vec<String> = caps.iter().map(|(k, v)| format!("\"{k}\": {v}")).collect();
        let forward_caps = cap_entries.join(", ");
        let reversed_caps = cap_entries.iter().rev().cloned().collect::<Vec<_>>().join(", ");

        let fields = |caps_text: &str| {
            [
                format!("\"daily_budget_usdc\": {budget}"),
                format!("\"category_caps\": {{{caps_text}}}"),
                "\"lane_by\": \"category\"".to_string(),
            ]
        };
        let written = fields(&forward_caps).join(", ");
        let shuffled_fields = fields(&reversed_caps);
        let shuffled = order
            .iter()
            .map(|&i| shuffled_fields[i].clone())
            .collect::<Vec<_>>()
            .join(", ");

        let hash = |text: &str| {
            let doc = PolicyDocument::from_value(serde_json::from_str(text).expect("json"))
                .expect("policy");
            policy_hash(&doc.source).expect("hash")
        };
        prop_assert_eq!(hash(&format!("{{{written}}}")), hash(&format!("{{{shuffled}}}")));
    }
}
