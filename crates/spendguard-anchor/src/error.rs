use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("RPC transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unexpected RPC response for {method}: {detail}")]
    InvalidResponse { method: String, detail: String },

    #[error("invalid {what}: {value} (expected 0x-prefixed hex)")]
    InvalidHex { what: &'static str, value: String },

    #[error("invalid private key: {0}")]
    InvalidKey(&'static str),

    #[error("no private key configured for anchoring")]
    MissingSigner,

    #[error("signing failed: {0}")]
    Signing(#[from] k256::ecdsa::Error),
}
