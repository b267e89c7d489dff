//! Anchoring and verification collaborators.
//!
//! The decision core hands a digest to an [`Anchor`] and only ever gets back an opaque
//! transaction hash plus receipt status. Verification reads the transaction input back
//! through a [`TransactionSource`] and compares bytes.

#![forbid(unsafe_code)]

mod error;
mod eth;
mod rlp;
mod rpc;
mod signer;

pub use error::AnchorError;
pub use eth::EthAnchor;
pub use rpc::{JsonRpcClient, RpcTransport, parse_quantity};
pub use signer::{LegacyTransaction, LocalSigner, SignedTransaction};

/// What the anchoring collaborator reports back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorReceipt {
    pub tx_hash: String,
    /// `false` when the transaction was accepted but no receipt arrived before the timeout.
    pub confirmed: bool,
    /// Raw status quantity from the receipt (`0x1` success, `0x0` reverted).
    pub status: Option<String>,
    pub block_number: Option<u64>,
}

impl AnchorReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("0x1")
    }
}

/// Publishes a digest and returns a reference to the publishing transaction.
pub trait Anchor {
    fn anchor(&self, digest_hex: &str) -> Result<AnchorReceipt, AnchorError>;
}

/// Reads back the payload of a published transaction.
pub trait TransactionSource {
    /// `Ok(None)` when the transaction is unknown to the network.
    fn transaction_input(&self, tx_hash: &str) -> Result<Option<String>, AnchorError>;
}

/// Connectivity checks used by `doctor`.
pub trait ChainInfo {
    fn chain_id(&self) -> Result<u64, AnchorError>;
    fn block_number(&self) -> Result<u64, AnchorError>;
    fn balance(&self, address: &str) -> Result<u128, AnchorError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Pass,
    Mismatch { actual: String },
    NotFound,
}

/// Compare the on-chain input of `tx_hash` with `digest_hex`, ignoring hex case.
pub fn verify_anchored<S: TransactionSource + ?Sized>(
    source: &S,
    tx_hash: &str,
    digest_hex: &str,
) -> Result<VerifyOutcome, AnchorError> {
    require_hex_prefix("tx hash", tx_hash)?;
    require_hex_prefix("digest", digest_hex)?;

    let Some(input) = source.transaction_input(tx_hash)? else {
        return Ok(VerifyOutcome::NotFound);
    };
    if input.eq_ignore_ascii_case(digest_hex) {
        Ok(VerifyOutcome::Pass)
    } else {
        Ok(VerifyOutcome::Mismatch { actual: input })
    }
}

pub(crate) fn require_hex_prefix(what: &'static str, value: &str) -> Result<(), AnchorError> {
    let valid = value
        .strip_prefix("0x")
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(AnchorError::InvalidHex {
            what,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct FixedSource(BTreeMap<String, String>);

    impl TransactionSource for FixedSource {
        fn transaction_input(&self, tx_hash: &str) -> Result<Option<String>, AnchorError> {
            Ok(self.0.get(tx_hash).cloned())
        }
    }

    fn source() -> FixedSource {
        FixedSource(BTreeMap::from([("0x01".to_string(), "0xABCDEF".to_string())]))
    }

    #[test]
    fn comparison_ignores_case() {
        let outcome = verify_anchored(&source(), "0x01", "0xabcdef").expect("verify");
        assert_eq!(outcome, VerifyOutcome::Pass);
    }

    #[test]
    fn mismatch_reports_actual_input() {
        let outcome = verify_anchored(&source(), "0x01", "0xabcdee").expect("verify");
        assert_eq!(
            outcome,
            VerifyOutcome::Mismatch {
                actual: "0xABCDEF".to_string()
            }
        );
    }

    #[test]
    fn unknown_transaction_is_not_found() {
        let outcome = verify_anchored(&source(), "0x02", "0xabcdef").expect("verify");
        assert_eq!(outcome, VerifyOutcome::NotFound);
    }

    #[test]
    fn arguments_need_hex_prefix() {
        let err = verify_anchored(&source(), "01", "0xabcdef").expect_err("bad tx");
        assert!(matches!(err, AnchorError::InvalidHex { what: "tx hash", .. }));
        let err = verify_anchored(&source(), "0x01", "0xzz").expect_err("bad digest");
        assert!(matches!(err, AnchorError::InvalidHex { what: "digest", .. }));
    }
}
