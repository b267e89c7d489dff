//! Render use cases: map output envelopes onto renderable models.

use spendguard_render::{
    RenderableBatch, RenderableCase, RenderableDecision, RenderableOutcome, RenderableProof,
    RenderableProofReport,
};
use spendguard_types::{BatchEnvelope, Decision, Intent, Outcome, ResultsEnvelope};
use time::format_description::well_known::Rfc3339;

fn to_renderable_decision(intent: &Intent, decision: &Decision) -> RenderableDecision {
    RenderableDecision {
        outcome: match decision.outcome {
            Outcome::Approve => RenderableOutcome::Approve,
            Outcome::Deny => RenderableOutcome::Deny,
            Outcome::Block => RenderableOutcome::Block,
        },
        intent: serde_json::to_value(intent).unwrap_or(serde_json::Value::Null),
        reasons: decision.reasons.clone(),
        lane: decision.nonce.lane.clone(),
        sequence: decision.nonce.sequence,
    }
}

pub fn batch_markdown(envelope: &BatchEnvelope) -> String {
    spendguard_render::render_batch_markdown(&RenderableBatch {
        project: envelope.project.clone(),
        decisions: envelope
            .out
            .iter()
            .map(|r| to_renderable_decision(&r.intent, &r.decision))
            .collect(),
    })
}

pub fn proof_markdown(results: &ResultsEnvelope) -> String {
    let cases = results
        .results
        .iter()
        .map(|r| RenderableCase {
            decision: to_renderable_decision(&r.intent, &r.decision),
            decision_digest: r.decision_digest.clone(),
            policy_hash: r.policy_hash.clone(),
            ts_bucket: r.ts_bucket,
            proof: match (&r.proof.tx_hash, r.proof.anchored) {
                (Some(tx_hash), true) => RenderableProof::Anchored {
                    tx_hash: tx_hash.clone(),
                    tx_link: r.proof.tx_link.clone().unwrap_or_else(|| tx_hash.clone()),
                    confirmed: r.proof.confirmed.unwrap_or(r.proof.status.is_some()),
                    status: r.proof.status.clone(),
                    block: r.proof.block,
                },
                _ => RenderableProof::NotAnchored {
                    error: r.proof.error.clone(),
                },
            },
        })
        .collect();

    spendguard_render::render_proof_markdown(&RenderableProofReport {
        chain_id: results.chain_id,
        generated_at: results
            .generated_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| results.generated_at.to_string()),
        cases,
    })
}
