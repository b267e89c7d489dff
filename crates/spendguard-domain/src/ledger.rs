//! State threading for the ledger.
//!
//! Every operation takes the current snapshot by reference and returns its successor.

use crate::model::ValidIntent;
use spendguard_types::{Decision, Intent, Ledger, LedgerEvent, Outcome};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("only approved decisions can be committed (outcome was {outcome})")]
    NotApproved { outcome: Outcome },

    #[error("intent is structurally invalid and cannot be committed")]
    InvalidIntent,
}

/// Adopt the decision's allocator state without appending spend.
///
/// Denied intents still consume their sequence slot; recording it keeps the lane gap-free.
pub fn record_allocation(ledger: &Ledger, decision: &Decision) -> Ledger {
    Ledger {
        events: ledger.events.clone(),
        nonce_state: decision.nonce_state_after.clone(),
    }
}

/// Append the approved intent as a spend event and adopt the decision's allocator state.
pub fn commit(
    ledger: &Ledger,
    intent: &Intent,
    decision: &Decision,
    recorded_at: Option<String>,
) -> Result<Ledger, CommitError> {
    if decision.outcome != Outcome::Approve {
        return Err(CommitError::NotApproved {
            outcome: decision.outcome,
        });
    }
    let valid = ValidIntent::from_intent(intent).ok_or(CommitError::InvalidIntent)?;

    let mut events = ledger.events.clone();
    events.push(LedgerEvent {
        ts: recorded_at,
        date: valid.date.to_string(),
        category: valid.category.to_string(),
        amount: Some(valid.amount),
        merchant: valid.merchant.to_string(),
        nonce: Some(decision.nonce.clone()),
    });

    Ok(Ledger {
        events,
        nonce_state: decision.nonce_state_after.clone(),
    })
}

/// Commit approvals and record the allocation of everything else.
pub fn apply(
    ledger: &Ledger,
    intent: &Intent,
    decision: &Decision,
    recorded_at: Option<String>,
) -> Ledger {
    match commit(ledger, intent, decision, recorded_at) {
        Ok(next) => next,
        Err(_) => record_allocation(ledger, decision),
    }
}
