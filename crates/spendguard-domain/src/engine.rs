use crate::aggregate::spent_on;
use crate::model::ValidIntent;
use crate::nonce;
use spendguard_types::{
    Constraints, Decision, Intent, LaneBy, Ledger, Nonce2d, Outcome, Policy, ids,
};

/// Evaluate one intent against `policy` and the committed spend in `ledger`.
///
/// Every structurally valid intent allocates exactly one nonce, denied ones included.
/// Blocked intents allocate nothing.
pub fn decide(policy: &Policy, intent: &Intent, ledger: &Ledger) -> Decision {
    let Some(valid) = ValidIntent::from_intent(intent) else {
        return blocked(ledger);
    };

    let spent_day = spent_on(ledger, valid.date, None);
    let spent_cat = spent_on(ledger, valid.date, Some(valid.category));
    let category_cap = policy.category_cap(valid.category);

    let mut reasons = Vec::new();
    let mut codes = Vec::new();

    // Order is part of the output contract: daily, category, merchant.
    if let Some(cap) = policy.daily_budget
        && spent_day + valid.amount > cap
    {
        reasons.push(format!(
            "Daily budget exceeded: spent {spent_day} + {} > {cap}",
            valid.amount
        ));
        codes.push(ids::CODE_DAILY_BUDGET_EXCEEDED.to_string());
    }
    if let Some(cap) = category_cap
        && spent_cat + valid.amount > cap
    {
        reasons.push(format!(
            "Category cap exceeded ({}): spent {spent_cat} + {} > {cap}",
            valid.category, valid.amount
        ));
        codes.push(ids::CODE_CATEGORY_CAP_EXCEEDED.to_string());
    }
    if policy.is_blocked(valid.merchant) {
        reasons.push(format!("Merchant blocked by policy: {}", valid.merchant));
        codes.push(ids::CODE_MERCHANT_BLOCKED.to_string());
    }

    let lane = match policy.lane_by() {
        LaneBy::Category => valid.category,
        LaneBy::Default => ids::DEFAULT_LANE,
    };
    let (nonce, nonce_state_after) = nonce::next(&ledger.nonce_state, lane);

    if !reasons.is_empty() {
        return Decision {
            outcome: Outcome::Deny,
            reasons,
            codes,
            constraints: None,
            nonce,
            nonce_state_after,
        };
    }

    let constraints = Constraints {
        max_amount: valid.amount,
        remaining_daily: policy
            .daily_budget
            .map(|cap| cap - (spent_day + valid.amount)),
        remaining_category: category_cap.map(|cap| cap - (spent_cat + valid.amount)),
    };

    Decision {
        outcome: Outcome::Approve,
        reasons: vec![format!("Approved by policy. Lane={lane}")],
        codes,
        constraints: Some(constraints),
        nonce,
        nonce_state_after,
    }
}

fn blocked(ledger: &Ledger) -> Decision {
    Decision {
        outcome: Outcome::Block,
        reasons: vec![ids::REASON_INVALID_INTENT.to_string()],
        codes: vec![ids::CODE_INVALID_INTENT.to_string()],
        constraints: None,
        nonce: Nonce2d::placeholder(),
        nonce_state_after: ledger.nonce_state.clone(),
    }
}
