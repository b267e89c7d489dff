use crate::error::AnchorError;
use crate::rpc::{JsonRpcClient, RpcTransport, parse_quantity};
use crate::signer::{LegacyTransaction, LocalSigner};
use crate::{Anchor, AnchorReceipt, ChainInfo, TransactionSource, require_hex_prefix};
use serde_json::{Value as JsonValue, json};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Anchors digests as the calldata of a zero-value self-transaction.
///
/// Transactions are signed locally by a [`LocalSigner`] and submitted with
/// `eth_sendRawTransaction`, so the endpoint needs no unlocked accounts.
pub struct EthAnchor<T = JsonRpcClient> {
    transport: T,
    signer: Option<LocalSigner>,
    /// Signing chain id; queried with `eth_chainId` when unset.
    chain_id: Option<u64>,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl EthAnchor<JsonRpcClient> {
    /// Connect over HTTP. `request_timeout` bounds each individual call.
    pub fn connect(rpc_url: &str, request_timeout: Duration) -> Result<Self, AnchorError> {
        Ok(Self::new(JsonRpcClient::new(rpc_url, request_timeout)?))
    }
}

impl<T: RpcTransport> EthAnchor<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            signer: None,
            chain_id: None,
            receipt_timeout: Duration::from_millis(30_000),
            poll_interval: Duration::from_millis(800),
        }
    }

    pub fn with_signer(mut self, signer: LocalSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_receipt_polling(mut self, timeout: Duration, interval: Duration) -> Self {
        self.receipt_timeout = timeout;
        self.poll_interval = interval;
        self
    }

    #[cfg(test)]
    fn transport(&self) -> &T {
        &self.transport
    }

    fn wait_for_receipt(&self, tx_hash: &str) -> Result<Option<JsonValue>, AnchorError> {
        let started = Instant::now();
        loop {
            let receipt = self
                .transport
                .call("eth_getTransactionReceipt", json!([tx_hash]))?;
            if !receipt.is_null() {
                return Ok(Some(receipt));
            }
            if started.elapsed() + self.poll_interval >= self.receipt_timeout {
                return Ok(None);
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn quantity(&self, method: &str, params: JsonValue) -> Result<u128, AnchorError> {
        let value = self.transport.call(method, params)?;
        value
            .as_str()
            .and_then(parse_quantity)
            .ok_or_else(|| AnchorError::InvalidResponse {
                method: method.to_string(),
                detail: format!("expected hex quantity, got {value}"),
            })
    }
}

impl<T: RpcTransport> Anchor for EthAnchor<T> {
    fn anchor(&self, digest_hex: &str) -> Result<AnchorReceipt, AnchorError> {
        require_hex_prefix("digest", digest_hex)?;
        let signer = self.signer.as_ref().ok_or(AnchorError::MissingSigner)?;
        let data = digest_hex
            .strip_prefix("0x")
            .and_then(|digits| hex::decode(digits).ok())
            .ok_or_else(|| AnchorError::InvalidHex {
                what: "digest",
                value: digest_hex.to_string(),
            })?;

        let from = signer.address();
        let chain_id = match self.chain_id {
            Some(id) => id,
            None => self.chain_id()?,
        };
        let nonce = self.quantity("eth_getTransactionCount", json!([from, "pending"]))?;
        let gas_price = self.quantity("eth_gasPrice", json!([]))?;
        let gas = self.quantity(
            "eth_estimateGas",
            json!([{ "from": from, "to": from, "value": "0x0", "data": digest_hex }]),
        )?;

        let signed = signer.sign(&LegacyTransaction {
            chain_id,
            nonce,
            gas_price,
            gas,
            to: signer.address_bytes(),
            value: 0,
            data,
        })?;
        debug!(%from, chain_id, nonce, gas, tx_hash = %signed.hash_hex(), "signed anchoring transaction");

        let sent = self
            .transport
            .call("eth_sendRawTransaction", json!([signed.raw_hex()]))?;
        let tx_hash = sent
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AnchorError::InvalidResponse {
                method: "eth_sendRawTransaction".to_string(),
                detail: format!("expected transaction hash, got {sent}"),
            })?;
        if !tx_hash.eq_ignore_ascii_case(&signed.hash_hex()) {
            warn!(%tx_hash, local = %signed.hash_hex(), "node reported a different transaction hash");
        }
        info!(%tx_hash, digest = digest_hex, "anchoring transaction sent");

        let Some(receipt) = self.wait_for_receipt(&tx_hash)? else {
            warn!(%tx_hash, timeout_ms = self.receipt_timeout.as_millis() as u64, "no receipt before timeout");
            return Ok(AnchorReceipt {
                tx_hash,
                confirmed: false,
                status: None,
                block_number: None,
            });
        };

        let status = receipt
            .get("status")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let block_number = receipt
            .get("blockNumber")
            .and_then(JsonValue::as_str)
            .and_then(parse_quantity)
            .and_then(|n| u64::try_from(n).ok());
        debug!(%tx_hash, ?status, ?block_number, "receipt received");

        Ok(AnchorReceipt {
            tx_hash,
            confirmed: true,
            status,
            block_number,
        })
    }
}

impl<T: RpcTransport> TransactionSource for EthAnchor<T> {
    fn transaction_input(&self, tx_hash: &str) -> Result<Option<String>, AnchorError> {
        let tx = self
            .transport
            .call("eth_getTransactionByHash", json!([tx_hash]))?;
        if tx.is_null() {
            return Ok(None);
        }
        let input = tx
            .get("input")
            .or_else(|| tx.get("data"))
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        Ok(Some(input.to_string()))
    }
}

impl<T: RpcTransport> ChainInfo for EthAnchor<T> {
    fn chain_id(&self) -> Result<u64, AnchorError> {
        let id = self.quantity("eth_chainId", json!([]))?;
        u64::try_from(id).map_err(|_| AnchorError::InvalidResponse {
            method: "eth_chainId".to_string(),
            detail: format!("chain id {id} does not fit in u64"),
        })
    }

    fn block_number(&self) -> Result<u64, AnchorError> {
        let block = self.quantity("eth_blockNumber", json!([]))?;
        u64::try_from(block).map_err(|_| AnchorError::InvalidResponse {
            method: "eth_blockNumber".to_string(),
            detail: format!("block number {block} does not fit in u64"),
        })
    }

    fn balance(&self, address: &str) -> Result<u128, AnchorError> {
        self.quantity("eth_getBalance", json!([address, "latest"]))
    }
}
