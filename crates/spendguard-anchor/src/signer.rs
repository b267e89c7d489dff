use crate::error::AnchorError;
use crate::rlp;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint as _;
use sha3::{Digest, Keccak256};
use std::fmt;

/// Pre-EIP-1559 transaction, signed with EIP-155 replay protection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub chain_id: u64,
    pub nonce: u128,
    pub gas_price: u128,
    pub gas: u128,
    pub to: [u8; 20],
    pub value: u128,
    pub data: Vec<u8>,
}

impl LegacyTransaction {
    fn encode(&self, signature: Option<(u128, &[u8], &[u8])>) -> Vec<u8> {
        let mut fields = vec![
            rlp::uint(self.nonce),
            rlp::uint(self.gas_price),
            rlp::uint(self.gas),
            rlp::bytes(&self.to),
            rlp::uint(self.value),
            rlp::bytes(&self.data),
        ];
        match signature {
            // EIP-155 signing preimage: chain id, then two empty fields
            None => fields.extend([rlp::uint(u128::from(self.chain_id)), rlp::uint(0), rlp::uint(0)]),
            Some((v, r, s)) => fields.extend([rlp::uint(v), rlp::big_endian(r), rlp::big_endian(s)]),
        }
        rlp::list(&fields)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// RLP bytes for `eth_sendRawTransaction`.
    pub raw: Vec<u8>,
    pub hash: [u8; 32],
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }
}

/// secp256k1 key held in memory; signs anchoring transactions locally.
pub struct LocalSigner {
    key: SigningKey,
    address: [u8; 20],
}

impl LocalSigner {
    /// Parse a 32-byte hex private key, with or without the `0x` prefix.
    pub fn from_hex(private_key: &str) -> Result<Self, AnchorError> {
        let trimmed = private_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|_| AnchorError::InvalidKey("expected 32 bytes of hex"))?;
        if bytes.len() != 32 {
            return Err(AnchorError::InvalidKey("expected 32 bytes of hex"));
        }
        let key = SigningKey::from_slice(&bytes)
            .map_err(|_| AnchorError::InvalidKey("not a valid secp256k1 scalar"))?;

        // keccak256 of the uncompressed public key without its 0x04 prefix; last 20 bytes
        let point = key.verifying_key().to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);

        Ok(Self { key, address })
    }

    pub fn address(&self) -> String {
        format!("0x{}", hex::encode(self.address))
    }

    pub fn address_bytes(&self) -> [u8; 20] {
        self.address
    }

    pub fn sign(&self, tx: &LegacyTransaction) -> Result<SignedTransaction, AnchorError> {
        let prehash = keccak256(&tx.encode(None));
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(&prehash)?;

        let v = u128::from(recovery_id.to_byte()) + u128::from(tx.chain_id) * 2 + 35;
        let rs = signature.to_bytes();
        let (r, s) = rs.split_at(32);
        let raw = tx.encode(Some((v, r, s)));
        let hash = keccak256(&raw);
        Ok(SignedTransaction { raw, hash })
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
