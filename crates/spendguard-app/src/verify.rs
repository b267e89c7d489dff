//! The `verify` use case: compare anchored transaction input with decision digests.

use spendguard_anchor::{AnchorError, TransactionSource, VerifyOutcome, verify_anchored};
use spendguard_types::ResultsEnvelope;
use tracing::warn;

pub fn verify_tx<S: TransactionSource + ?Sized>(
    source: &S,
    tx_hash: &str,
    digest_hex: &str,
) -> Result<VerifyOutcome, AnchorError> {
    verify_anchored(source, tx_hash, digest_hex)
}

/// Exit code for a single verification: 0 pass, 4 mismatch, 3 transaction not found.
pub fn verify_exit_code(outcome: &VerifyOutcome) -> i32 {
    match outcome {
        VerifyOutcome::Pass => 0,
        VerifyOutcome::Mismatch { .. } => 4,
        VerifyOutcome::NotFound => 3,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyStatus {
    Pass,
    Fail(String),
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyLine {
    pub outcome: String,
    pub tx_hash: Option<String>,
    pub status: VerifyStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifySummary {
    pub lines: Vec<VerifyLine>,
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
}

impl VerifySummary {
    pub fn exit_code(&self) -> i32 {
        if self.fail > 0 { 4 } else { 0 }
    }
}

/// Verify every anchored record. Unanchored records are skipped; per-record RPC errors fail
/// that record only.
pub fn verify_results<S: TransactionSource + ?Sized>(
    source: &S,
    results: &ResultsEnvelope,
) -> VerifySummary {
    let mut summary = VerifySummary::default();

    for record in &results.results {
        let outcome = record.decision.outcome.to_string();
        let tx_hash = record
            .proof
            .tx_hash
            .clone()
            .filter(|_| record.proof.anchored);

        let Some(tx) = tx_hash.as_deref() else {
            summary.skip += 1;
            summary.lines.push(VerifyLine {
                outcome,
                tx_hash: None,
                status: VerifyStatus::Skip,
            });
            continue;
        };

        let status = match verify_anchored(source, tx, &record.decision_digest) {
            Ok(VerifyOutcome::Pass) => VerifyStatus::Pass,
            Ok(VerifyOutcome::NotFound) => VerifyStatus::Fail("tx not found".to_string()),
            Ok(VerifyOutcome::Mismatch { actual }) => VerifyStatus::Fail(format!(
                "mismatch: expected {} got {actual}",
                record.decision_digest
            )),
            Err(e) => {
                warn!(tx_hash = tx, error = %e, "verification failed");
                VerifyStatus::Fail(e.to_string())
            }
        };
        match status {
            VerifyStatus::Pass => summary.pass += 1,
            _ => summary.fail += 1,
        }
        summary.lines.push(VerifyLine {
            outcome,
            tx_hash: tx_hash.clone(),
            status,
        });
    }

    summary
}

pub fn format_summary(summary: &VerifySummary) -> String {
    let mut out = String::new();
    for line in &summary.lines {
        let tx = line.tx_hash.as_deref().unwrap_or("-");
        match &line.status {
            VerifyStatus::Pass => out.push_str(&format!("PASS {} {}\n", line.outcome, tx)),
            VerifyStatus::Fail(why) => {
                out.push_str(&format!("FAIL {} {} ({})\n", line.outcome, tx, why))
            }
            VerifyStatus::Skip => out.push_str(&format!("SKIP (not anchored) {}\n", line.outcome)),
        }
    }
    out.push_str(&format!(
        "Summary: PASS={} FAIL={} SKIP={}\n",
        summary.pass, summary.fail, summary.skip
    ));
    out
}
