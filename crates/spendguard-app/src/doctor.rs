//! The `doctor` use case: check the anchoring endpoint and the signing wallet.

use anyhow::Context;
use spendguard_anchor::ChainInfo;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoctorReport {
    pub chain_id: u64,
    pub expected_chain_id: u64,
    pub block_number: u64,
    /// Wallet derived from the signing key and its balance in wei, when a key is configured.
    pub wallet: Option<(String, u128)>,
}

impl DoctorReport {
    pub fn chain_id_matches(&self) -> bool {
        self.chain_id == self.expected_chain_id
    }
}

pub fn run_doctor<C: ChainInfo + ?Sized>(
    chain: &C,
    expected_chain_id: u64,
    wallet: Option<&str>,
) -> anyhow::Result<DoctorReport> {
    let chain_id = chain.chain_id().context("query chain id")?;
    let block_number = chain.block_number().context("query block number")?;
    if chain_id != expected_chain_id {
        warn!(chain_id, expected_chain_id, "chain id mismatch");
    }

    let wallet = match wallet {
        Some(address) => {
            let balance = chain
                .balance(address)
                .with_context(|| format!("query balance of {address}"))?;
            Some((address.to_string(), balance))
        }
        None => None,
    };

    Ok(DoctorReport {
        chain_id,
        expected_chain_id,
        block_number,
        wallet,
    })
}

pub fn format_doctor(report: &DoctorReport) -> String {
    let mut out = format!(
        "RPC OK: chainId={} block={}\n",
        report.chain_id, report.block_number
    );
    if !report.chain_id_matches() {
        out.push_str(&format!(
            "WARN: expected chainId {}\n",
            report.expected_chain_id
        ));
    }
    match &report.wallet {
        Some((address, balance)) => {
            out.push_str(&format!("Wallet: {address}\n"));
            out.push_str(&format!("Balance: {balance} (wei)\n"));
        }
        None => out.push_str("No private key set (anchoring will be skipped).\n"),
    }
    out
}
