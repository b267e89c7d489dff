//! The shared evaluation loop behind `run` and `prove`.

use anyhow::Context;
use spendguard_types::{Decision, Intent, Ledger, Policy};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluated {
    pub decisions: Vec<(Intent, Decision)>,
    /// Successor ledger: approvals committed, every allocation recorded.
    pub ledger: Ledger,
}

/// Decide each intent in order against one threaded ledger value.
pub fn evaluate_intents(
    policy: &Policy,
    ledger: &Ledger,
    intents: &[Intent],
    recorded_at: OffsetDateTime,
) -> anyhow::Result<Evaluated> {
    let ts = recorded_at.format(&Rfc3339).context("format commit time")?;

    let mut current = ledger.clone();
    let mut decisions = Vec::with_capacity(intents.len());

    for intent in intents {
        let decision = spendguard_domain::decide(policy, intent, &current);
        info!(
            outcome = %decision.outcome,
            lane = %decision.nonce.lane,
            sequence = decision.nonce.sequence,
            "decided intent"
        );
        debug!(reasons = ?decision.reasons);

        current = spendguard_domain::apply(&current, intent, &decision, Some(ts.clone()));
        decisions.push((intent.clone(), decision));
    }

    Ok(Evaluated {
        decisions,
        ledger: current,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendguard_types::Outcome;
    use time::macros::datetime;

    #[test]
    fn ledger_is_threaded_between_intents() {
        let policy: Policy = serde_json::from_str(
            r#"{"daily_budget": 15, "category_caps": {"food": 12}, "lane_by": "category"}"#,
        )
        .expect("policy");
        let intents = vec![
            Intent::new("2024-01-01", "food", 10.0, None),
            Intent::new("2024-01-01", "food", 5.0, None),
            Intent::new("2024-01-01", "transport", 5.0, None),
            Intent::default(),
        ];

        let out = evaluate_intents(
            &policy,
            &Ledger::default(),
            &intents,
            datetime!(2024-01-01 12:00 UTC),
        )
        .expect("evaluate");

        let outcomes: Vec<Outcome> = out.decisions.iter().map(|(_, d)| d.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Approve, Outcome::Deny, Outcome::Approve, Outcome::Block]
        );
        assert_eq!(out.decisions[1].1.nonce.sequence, 2);
        assert_eq!(out.ledger.events.len(), 2);
        assert_eq!(out.ledger.nonce_state.current("food"), 2);
        assert_eq!(out.ledger.nonce_state.current("transport"), 1);
        assert_eq!(
            out.ledger.events[0].ts.as_deref(),
            Some("2024-01-01T12:00:00Z")
        );
    }
}
