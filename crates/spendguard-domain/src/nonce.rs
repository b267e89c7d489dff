use spendguard_types::{Nonce2d, NonceState};

/// Issue the next sequence on `lane`.
///
/// Returns the allocated nonce together with the successor state; `state` itself is left
/// untouched. A lane that has never been used starts at 1.
pub fn next(state: &NonceState, lane: &str) -> (Nonce2d, NonceState) {
    let sequence = state.current(lane).saturating_add(1);
    (
        Nonce2d::new(lane, sequence),
        state.with_sequence(lane, sequence),
    )
}
