//! Explain registry for reason checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and when it fires.
    pub description: &'static str,
    /// How to get an intent through, or how to adjust the policy.
    pub remediation: &'static str,
    /// Before/after policy or intent examples.
    pub examples: ExamplePair,
}

/// Before and after JSON examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Document that produces the reason.
    pub before: &'static str,
    /// Document that does not.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::CHECK_INTENT_STRUCTURE | ids::CODE_INVALID_INTENT => Some(explain_invalid_intent()),
        ids::CHECK_POLICY_DAILY_BUDGET | ids::CODE_DAILY_BUDGET_EXCEEDED => {
            Some(explain_daily_budget())
        }
        ids::CHECK_POLICY_CATEGORY_CAP | ids::CODE_CATEGORY_CAP_EXCEEDED => {
            Some(explain_category_cap())
        }
        ids::CHECK_POLICY_BLOCKED_MERCHANT | ids::CODE_MERCHANT_BLOCKED => {
            Some(explain_blocked_merchant())
        }
        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_INTENT_STRUCTURE,
        ids::CHECK_POLICY_DAILY_BUDGET,
        ids::CHECK_POLICY_CATEGORY_CAP,
        ids::CHECK_POLICY_BLOCKED_MERCHANT,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_INVALID_INTENT,
        ids::CODE_DAILY_BUDGET_EXCEEDED,
        ids::CODE_CATEGORY_CAP_EXCEEDED,
        ids::CODE_MERCHANT_BLOCKED,
    ]
}

fn explain_invalid_intent() -> Explanation {
    Explanation {
        title: "Structurally Invalid Intent",
        description: "\
An intent must carry a non-empty `date`, a non-empty `category` and a numeric,
non-negative `amount`. When any of these is missing the intent is answered with
`block` before any budget math runs.

A blocked intent does not consume a nonce: the decision carries the placeholder
`{\"lane\": \"default\", \"sequence\": 0}` and the allocator state is unchanged.",
        remediation: "\
Supply all three fields. `amount` must be a JSON number, not a string:
- `\"amount\": 10` is accepted
- `\"amount\": \"10\"` is blocked",
        examples: ExamplePair {
            before: r#"{"category": "food", "amount": "10"}"#,
            after: r#"{"date": "2024-01-01", "category": "food", "amount": 10}"#,
        },
    }
}

fn explain_daily_budget() -> Explanation {
    Explanation {
        title: "Daily Budget",
        description: "\
Sums every committed ledger event with the intent's `date` and denies the intent
when that total plus the intent's amount is strictly greater than `daily_budget`.

Landing exactly on the budget is allowed. A policy without `daily_budget` has no
daily cap, and approvals then report `remaining_daily: null`.",
        remediation: "\
Lower the amount, move the spend to another date, or raise `daily_budget`.
The legacy key `daily_budget_usdc` is accepted with the same meaning.",
        examples: ExamplePair {
            before: r#"{"daily_budget": 15}
spent today: 10, intent amount: 6"#,
            after: r#"{"daily_budget": 20}
spent today: 10, intent amount: 6"#,
        },
    }
}

fn explain_category_cap() -> Explanation {
    Explanation {
        title: "Category Cap",
        description: "\
Sums committed ledger events with the intent's `date` and `category` and denies
the intent when that total plus the intent's amount is strictly greater than the
category's entry in `category_caps`.

Categories without an entry are uncapped and report `remaining_category: null`.",
        remediation: "\
Lower the amount, or raise or add the category's cap. The legacy key
`category_caps_usdc` is accepted with the same meaning.",
        examples: ExamplePair {
            before: r#"{"category_caps": {"food": 12}}
spent on food today: 8, intent amount: 5"#,
            after: r#"{"category_caps": {"food": 15}}
spent on food today: 8, intent amount: 5"#,
        },
    }
}

fn explain_blocked_merchant() -> Explanation {
    Explanation {
        title: "Blocked Merchant",
        description: "\
Denies any intent whose `merchant` appears verbatim in `blocked_merchants`,
regardless of amount. Matching is exact and case-sensitive.

This reason is evaluated after the budget checks and is reported alongside them,
so a single deny can carry up to three reasons.",
        remediation: "\
Pay a different merchant, or remove the merchant from `blocked_merchants` if the
block is no longer wanted.",
        examples: ExamplePair {
            before: r#"{"blocked_merchants": ["scam-mart"]}
intent merchant: "scam-mart""#,
            after: r#"{"blocked_merchants": []}
intent merchant: "scam-mart""#,
        },
    }
}
