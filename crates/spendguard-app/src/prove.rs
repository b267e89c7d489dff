//! The `prove` use case: decide, digest, and optionally anchor each intent.
//!
//! Evaluation runs against a scratch copy of the ledger; nothing is committed. Committing is
//! the job of `run`, so proving a batch that was already run never double-counts spend.

use crate::evaluate::evaluate_intents;
use anyhow::Context;
use spendguard_anchor::Anchor;
use spendguard_domain::{DigestInput, decision_digest};
use spendguard_settings::AnchorSettings;
use spendguard_types::{
    AnchorProof, Intent, Ledger, PolicyDocument, ProofRecord, ResultsEnvelope, SCHEMA_RESULTS_V1,
};
use std::num::NonZeroU64;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Proof error recorded when no anchor is configured.
pub const ANCHOR_SKIPPED: &str = "missing rpc_url or private key; skipped anchoring";

pub struct ProveInput<'a> {
    pub policy: &'a PolicyDocument,
    pub ledger: &'a Ledger,
    pub intents: &'a [Intent],
    pub now: OffsetDateTime,
    pub bucket_seconds: NonZeroU64,
    pub anchor_settings: &'a AnchorSettings,
    /// `None` skips anchoring; every record then carries [`ANCHOR_SKIPPED`].
    pub anchor: Option<&'a dyn Anchor>,
}

#[derive(Clone, Debug)]
pub struct ProveOutput {
    pub results: ResultsEnvelope,
}

pub fn run_prove(input: ProveInput<'_>) -> anyhow::Result<ProveOutput> {
    let now_secs = u64::try_from(input.now.unix_timestamp())
        .context("system clock is before the unix epoch")?;

    let evaluated = evaluate_intents(&input.policy.policy, input.ledger, input.intents, input.now)?;

    let mut results = Vec::with_capacity(evaluated.decisions.len());
    for (intent, decision) in evaluated.decisions {
        let digest = decision_digest(
            &DigestInput::from_decision(input.policy, &intent, &decision),
            now_secs,
            input.bucket_seconds,
        )
        .context("compute decision digest")?;
        info!(digest = %digest.digest_hex, bucket = digest.bucket, "decision digest");

        let proof = match input.anchor {
            Some(anchor) => anchor_proof(anchor, input.anchor_settings, &digest.digest_hex),
            None => AnchorProof::failed(ANCHOR_SKIPPED),
        };

        results.push(ProofRecord {
            intent,
            decision,
            decision_digest: digest.digest_hex,
            policy_hash: digest.policy_hash,
            ts_bucket: digest.bucket,
            proof,
        });
    }

    Ok(ProveOutput {
        results: ResultsEnvelope {
            schema: SCHEMA_RESULTS_V1.to_string(),
            tool: crate::tool_meta(),
            generated_at: input.now,
            chain_id: Some(input.anchor_settings.chain_id),
            results,
        },
    })
}

// Anchoring failures are recorded on the proof; they never discard the digest.
fn anchor_proof(anchor: &dyn Anchor, settings: &AnchorSettings, digest_hex: &str) -> AnchorProof {
    match anchor.anchor(digest_hex) {
        Ok(receipt) => {
            if !receipt.confirmed {
                warn!(tx_hash = %receipt.tx_hash, "anchored without a receipt");
            }
            let tx_link = settings.tx_link(&receipt.tx_hash);
            AnchorProof::anchored(
                settings.chain_id,
                receipt.tx_hash,
                tx_link,
                receipt.confirmed,
                receipt.status,
                receipt.block_number,
            )
        }
        Err(e) => {
            warn!(error = %e, "anchoring failed");
            AnchorProof::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RunInput, run_batch};
    use spendguard_anchor::{AnchorError, AnchorReceipt};
    use spendguard_settings::{Overrides, SpendguardConfigV1, resolve_config};
    use spendguard_types::Outcome;
    use std::cell::RefCell;
    use time::macros::datetime;

    #[derive(Default)]
    struct RecordingAnchor {
        seen: RefCell<Vec<String>>,
        fail: bool,
        unconfirmed: bool,
    }

    impl Anchor for RecordingAnchor {
        fn anchor(&self, digest_hex: &str) -> Result<AnchorReceipt, AnchorError> {
            self.seen.borrow_mut().push(digest_hex.to_string());
            if self.fail {
                return Err(AnchorError::Rpc {
                    code: -32000,
                    message: "insufficient funds".to_string(),
                });
            }
            let tx_hash = format!("0x{:02x}", self.seen.borrow().len());
            if self.unconfirmed {
                return Ok(AnchorReceipt {
                    tx_hash,
                    confirmed: false,
                    status: None,
                    block_number: None,
                });
            }
            Ok(AnchorReceipt {
                tx_hash,
                confirmed: true,
                status: Some("0x1".to_string()),
                block_number: Some(9),
            })
        }
    }

    fn settings(explorer: Option<&str>) -> AnchorSettings {
        let mut anchor = resolve_config(SpendguardConfigV1::default(), Overrides::default())
            .expect("resolve")
            .anchor;
        anchor.explorer_tx_base = explorer.map(str::to_string);
        anchor
    }

    fn scenario() -> (PolicyDocument, Vec<Intent>) {
        let policy = spendguard_settings::parse_policy_json(
            r#"{"daily_budget": 15, "category_caps": {"food": 12}, "blocked_merchants": ["scam-mart"], "lane_by": "category"}"#,
        )
        .expect("policy");
        let intents = vec![
            Intent::new("2024-01-01", "food", 10.0, Some("deli")),
            Intent::new("2024-01-01", "food", 20.0, Some("scam-mart")),
        ];
        (policy, intents)
    }

    fn minute() -> NonZeroU64 {
        NonZeroU64::new(60).expect("non-zero")
    }

    fn prove(
        policy: &PolicyDocument,
        ledger: &Ledger,
        intents: &[Intent],
        settings: &AnchorSettings,
        anchor: Option<&dyn Anchor>,
    ) -> ProveOutput {
        run_prove(ProveInput {
            policy,
            ledger,
            intents,
            now: datetime!(2023-11-14 22:13:20 UTC),
            bucket_seconds: minute(),
            anchor_settings: settings,
            anchor,
        })
        .expect("prove")
    }

    #[test]
    fn skipped_anchoring_keeps_digests() {
        let (policy, intents) = scenario();
        let out = prove(&policy, &Ledger::default(), &intents, &settings(None), None);

        let first = &out.results.results[0];
        assert_eq!(
            first.decision_digest,
            "0xb6f42b9bd6cf286066e924421af7644e9daac9277db9f25d59ed55e181f7171e"
        );
        assert_eq!(
            first.policy_hash,
            "0x4ad0e6464f2c518ddf4a38ba92e60e4af42c4e685104d64546c6b3f092b2d442"
        );
        assert_eq!(first.ts_bucket, 1_699_999_980);
        assert_eq!(first.proof, AnchorProof::failed(ANCHOR_SKIPPED));
        assert_eq!(out.results.schema, "spendguard.results.v1");
        assert_eq!(out.results.chain_id, Some(42431));
    }

    #[test]
    fn anchored_records_carry_links() {
        let (policy, intents) = scenario();
        let settings = settings(Some("https://explore.example/tx/"));
        let anchor = RecordingAnchor::default();

        let out = prove(&policy, &Ledger::default(), &intents, &settings, Some(&anchor));

        assert_eq!(anchor.seen.borrow().len(), 2);
        let proof = &out.results.results[1].proof;
        assert!(proof.anchored);
        assert_eq!(proof.confirmed, Some(true));
        assert_eq!(proof.tx_hash.as_deref(), Some("0x02"));
        assert_eq!(
            proof.tx_link.as_deref(),
            Some("https://explore.example/tx/0x02")
        );
        assert_eq!(
            anchor.seen.borrow()[0],
            out.results.results[0].decision_digest
        );
    }

    #[test]
    fn unconfirmed_anchoring_is_recorded_as_such() {
        let (policy, intents) = scenario();
        let anchor = RecordingAnchor {
            unconfirmed: true,
            ..RecordingAnchor::default()
        };

        let out = prove(&policy, &Ledger::default(), &intents, &settings(None), Some(&anchor));

        let proof = &out.results.results[0].proof;
        assert!(proof.anchored);
        assert_eq!(proof.confirmed, Some(false));
        assert_eq!(proof.status, None);
    }

    #[test]
    fn anchor_errors_are_recorded_not_raised() {
        let (policy, intents) = scenario();
        let anchor = RecordingAnchor {
            fail: true,
            ..RecordingAnchor::default()
        };

        let out = prove(&policy, &Ledger::default(), &intents, &settings(None), Some(&anchor));

        let proof = &out.results.results[0].proof;
        assert!(!proof.anchored);
        assert_eq!(
            proof.error.as_deref(),
            Some("RPC error -32000: insufficient funds")
        );
        assert_eq!(out.results.results.len(), 2);
    }

    #[test]
    fn prove_after_run_reads_the_committed_ledger_without_advancing_it() {
        let (policy, intents) = scenario();
        let ran = run_batch(RunInput {
            project: "demo",
            policy: &policy.policy,
            ledger: &Ledger::default(),
            intents: &intents[..1],
            now: datetime!(2024-01-01 00:00 UTC),
        })
        .expect("run");
        let committed = ran.ledger;
        assert_eq!(committed.events.len(), 1);
        assert_eq!(committed.nonce_state.current("food"), 1);

        let first = prove(&policy, &committed, &intents[..1], &settings(None), None);
        let second = prove(&policy, &committed, &intents[..1], &settings(None), None);

        let decision = &first.results.results[0].decision;
        assert_eq!(decision.nonce.sequence, 2);
        // 10 already spent on food against a cap of 12
        assert_eq!(decision.outcome, Outcome::Deny);
        assert_eq!(
            first.results.results[0].decision_digest,
            second.results.results[0].decision_digest
        );
    }
}
