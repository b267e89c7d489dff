//! The `run` use case: decide a batch of intents and advance the ledger.

use crate::evaluate::evaluate_intents;
use spendguard_types::{BatchEnvelope, DecisionRecord, Intent, Ledger, Policy};
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct RunInput<'a> {
    pub project: &'a str,
    pub policy: &'a Policy,
    pub ledger: &'a Ledger,
    pub intents: &'a [Intent],
    pub now: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct RunOutput {
    pub envelope: BatchEnvelope,
    pub ledger: Ledger,
}

pub fn run_batch(input: RunInput<'_>) -> anyhow::Result<RunOutput> {
    let evaluated = evaluate_intents(input.policy, input.ledger, input.intents, input.now)?;

    let out = evaluated
        .decisions
        .into_iter()
        .map(|(intent, decision)| DecisionRecord { intent, decision })
        .collect();

    Ok(RunOutput {
        envelope: BatchEnvelope {
            project: input.project.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            out,
        },
        ledger: evaluated.ledger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn envelope_lists_every_intent_in_order() {
        let policy = Policy {
            blocked_merchants: vec!["scam-mart".to_string()],
            ..Policy::default()
        };
        let intents = vec![
            Intent::new("2024-01-01", "food", 3.0, Some("scam-mart")),
            Intent::new("2024-01-01", "food", 3.0, Some("deli")),
        ];

        let output = run_batch(RunInput {
            project: "demo",
            policy: &policy,
            ledger: &Ledger::default(),
            intents: &intents,
            now: datetime!(2024-01-01 00:00 UTC),
        })
        .expect("run");

        assert_eq!(output.envelope.project, "demo");
        assert_eq!(output.envelope.out.len(), 2);
        assert_eq!(
            output.envelope.out[0].decision.reasons,
            vec!["Merchant blocked by policy: scam-mart"]
        );
        assert_eq!(output.envelope.out[1].decision.nonce.sequence, 2);
        assert_eq!(output.ledger.events.len(), 1);

        let json = serde_json::to_value(&output.envelope).expect("serialize");
        assert_eq!(json["out"][1]["decision"]["outcome"], "approve");
    }
}
