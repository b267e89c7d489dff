use crate::{
    RenderableBatch, RenderableDecision, RenderableOutcome, RenderableProof,
    RenderableProofReport,
};

fn outcome_label(outcome: RenderableOutcome) -> &'static str {
    match outcome {
        RenderableOutcome::Approve => "APPROVE",
        RenderableOutcome::Deny => "DENY",
        RenderableOutcome::Block => "BLOCK",
    }
}

fn push_decision(out: &mut String, d: &RenderableDecision) {
    out.push_str(&format!("- intent: `{}`\n", d.intent));
    out.push_str(&format!("- nonce: `{}/{}`\n", d.lane, d.sequence));
    for reason in &d.reasons {
        out.push_str(&format!("- reason: {}\n", reason));
    }
}

pub fn render_batch_markdown(batch: &RenderableBatch) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Spendguard decisions: {}\n\n", batch.project));

    let count = |o: RenderableOutcome| batch.decisions.iter().filter(|d| d.outcome == o).count();
    out.push_str(&format!(
        "- Approved: {}\n- Denied: {}\n- Blocked: {}\n\n",
        count(RenderableOutcome::Approve),
        count(RenderableOutcome::Deny),
        count(RenderableOutcome::Block)
    ));

    if batch.decisions.is_empty() {
        out.push_str("No intents.\n");
        return out;
    }

    for (i, d) in batch.decisions.iter().enumerate() {
        out.push_str(&format!("## Intent {}: {}\n", i + 1, outcome_label(d.outcome)));
        push_decision(&mut out, d);
        out.push('\n');
    }

    out
}

pub fn render_proof_markdown(report: &RenderableProofReport) -> String {
    let mut out = String::new();

    out.push_str("# Spendguard proof report\n\n");
    out.push_str(
        "Each policy decision below is bound to a decision digest; anchored digests are \
         tamper-evident receipts on chain.\n\n",
    );
    match report.chain_id {
        Some(id) => out.push_str(&format!("- chain_id: {}\n", id)),
        None => out.push_str("- chain_id: (none)\n"),
    }
    out.push_str(&format!("- generated: {}\n\n", report.generated_at));

    if report.cases.is_empty() {
        out.push_str("No cases.\n");
        return out;
    }

    for (i, case) in report.cases.iter().enumerate() {
        out.push_str(&format!(
            "## Case {}: {}\n",
            i + 1,
            outcome_label(case.decision.outcome)
        ));
        push_decision(&mut out, &case.decision);
        out.push_str(&format!("- decision_digest: `{}`\n", case.decision_digest));
        out.push_str(&format!("- policy_hash: `{}`\n", case.policy_hash));
        out.push_str(&format!("- ts_bucket: {}\n", case.ts_bucket));

        match &case.proof {
            RenderableProof::Anchored {
                tx_hash,
                tx_link,
                confirmed,
                status,
                block,
            } => {
                out.push_str(&format!("- tx: {}\n", tx_link));
                if tx_link != tx_hash {
                    out.push_str(&format!("- tx_hash: `{}`\n", tx_hash));
                }
                let status = match (confirmed, status.as_deref()) {
                    (false, _) => "unconfirmed (no receipt before timeout)",
                    (true, Some(status)) => status,
                    (true, None) => "unknown",
                };
                out.push_str(&format!("- receipt_status: {}\n", status));
                if let Some(block) = block {
                    out.push_str(&format!("- block: {}\n", block));
                }
            }
            RenderableProof::NotAnchored { error } => {
                out.push_str("- tx: (not anchored)\n");
                out.push_str(&format!(
                    "- error: {}\n",
                    error.as_deref().unwrap_or("unknown")
                ));
            }
        }
        out.push('\n');
    }

    out
}
