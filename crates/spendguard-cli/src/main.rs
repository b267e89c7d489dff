//! CLI entry point for spendguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `spendguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use spendguard_anchor::{Anchor, AnchorError, EthAnchor, LocalSigner, VerifyOutcome};
use spendguard_app::{
    DigestInput, ExplainOutput, ProveInput, RunInput, batch_markdown, format_doctor,
    format_summary, load_config, load_intents, load_ledger, load_policy, load_results,
    proof_markdown, run_batch, run_digest, run_doctor, run_explain, run_policy_from_text,
    run_prove, verify_exit_code, verify_results, verify_tx, write_json, write_text,
};
use spendguard_settings::{Overrides, ResolvedConfig};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Upper bound for a single JSON-RPC round trip.
const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Parser, Debug)]
#[command(
    name = "spendguard",
    version,
    about = "Deterministic spend-policy decisions with anchorable digests"
)]
struct Cli {
    /// Path to spendguard config TOML.
    #[arg(long, default_value = "spendguard.toml", global = true)]
    config: Utf8PathBuf,

    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the policy JSON path.
    #[arg(long, global = true)]
    policy: Option<Utf8PathBuf>,

    /// Override the ledger JSON path.
    #[arg(long, global = true)]
    ledger: Option<Utf8PathBuf>,

    /// Override the intents JSON path.
    #[arg(long, global = true)]
    intents: Option<Utf8PathBuf>,

    /// Override the output directory for proof artifacts.
    #[arg(long, global = true)]
    out_dir: Option<Utf8PathBuf>,

    /// Override the digest time bucket width in seconds.
    #[arg(long, global = true)]
    ts_bucket_seconds: Option<u64>,

    /// JSON-RPC endpoint used for anchoring and verification.
    #[arg(long, env = "SPENDGUARD_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Expected chain id.
    #[arg(long, env = "SPENDGUARD_CHAIN_ID", global = true)]
    chain_id: Option<u64>,

    /// Hex private key that signs anchoring transactions locally.
    #[arg(long, env = "SPENDGUARD_PRIVATE_KEY", hide_env_values = true, global = true)]
    private_key: Option<String>,

    /// Block explorer prefix for transaction links.
    #[arg(long, env = "SPENDGUARD_EXPLORER_TX_BASE", global = true)]
    explorer_tx_base: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate intents in order, commit approvals to the ledger, and print the decisions.
    Run {
        /// Write the decisions JSON here instead of stdout.
        #[arg(long)]
        out: Option<Utf8PathBuf>,
        /// Also write a Markdown summary.
        #[arg(long)]
        md: Option<Utf8PathBuf>,
    },

    /// Evaluate intents, compute decision digests, and anchor them when configured.
    Prove,

    /// Check anchored transactions against decision digests.
    Verify {
        /// Transaction hash to check.
        #[arg(long, requires = "digest", conflicts_with = "results")]
        tx: Option<String>,
        /// Expected decision digest.
        #[arg(long, requires = "tx")]
        digest: Option<String>,
        /// Verify every anchored record in a results.json.
        #[arg(long)]
        results: Option<Utf8PathBuf>,
    },

    /// Print the decision digest for a single intent without anchoring.
    Digest {
        /// Intent JSON holding exactly one intent (defaults to the configured intents file).
        #[arg(long)]
        intent: Option<Utf8PathBuf>,
        /// Unix seconds used for the time bucket (defaults to now).
        #[arg(long)]
        now: Option<u64>,
    },

    /// Build a policy from short free text.
    PolicyFromText {
        /// The policy text, e.g. "daily 15, food 12, block scam-mart".
        #[arg(long)]
        text: String,
        /// Where to write the policy JSON (if not specified, prints to stdout).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Check the RPC endpoint and the wallet of the signing key.
    Doctor,

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "policy.daily_budget") or code (e.g., "merchant_blocked") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Existing environment variables win over `.env`.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.cmd {
        Commands::Run { out, md } => cmd_run(&cli, out.as_deref(), md.as_deref()),
        Commands::Prove => cmd_prove(&cli),
        Commands::Verify {
            tx,
            digest,
            results,
        } => cmd_verify(&cli, tx.as_deref(), digest.as_deref(), results.as_deref()),
        Commands::Digest { intent, now } => cmd_digest(&cli, intent.as_deref(), *now),
        Commands::PolicyFromText { text, out } => cmd_policy_from_text(text, out.as_deref()),
        Commands::Doctor => cmd_doctor(&cli),
        Commands::Explain { identifier } => cmd_explain(identifier),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("spendguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn resolve(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    let cfg = load_config(&cli.config)?;
    let overrides = Overrides {
        policy: cli.policy.clone(),
        ledger: cli.ledger.clone(),
        intents: cli.intents.clone(),
        out_dir: cli.out_dir.clone(),
        ts_bucket_seconds: cli.ts_bucket_seconds,
        rpc_url: cli.rpc_url.clone(),
        chain_id: cli.chain_id,
        private_key: cli.private_key.clone(),
        explorer_tx_base: cli.explorer_tx_base.clone(),
    };
    let resolved = spendguard_settings::resolve_config(cfg, overrides).context("resolve config")?;
    debug!(?resolved, "resolved config");
    Ok(resolved)
}

fn unix_secs(now: OffsetDateTime) -> anyhow::Result<u64> {
    u64::try_from(now.unix_timestamp()).context("system clock is before the unix epoch")
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serialize output")?
    );
    Ok(())
}

fn cmd_run(cli: &Cli, out: Option<&Utf8Path>, md: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let resolved = resolve(cli)?;
    let policy = load_policy(&resolved.policy)?;
    let ledger = load_ledger(&resolved.ledger)?;
    let intents = load_intents(&resolved.intents)?;

    let output = run_batch(RunInput {
        project: &resolved.project,
        policy: &policy.policy,
        ledger: &ledger,
        intents: &intents,
        now: OffsetDateTime::now_utc(),
    })?;

    write_json(&resolved.ledger, &output.ledger).context("write ledger")?;
    match out {
        Some(path) => write_json(path, &output.envelope).context("write decisions")?,
        None => print_json(&output.envelope)?,
    }
    if let Some(path) = md {
        write_text(path, &batch_markdown(&output.envelope)).context("write markdown")?;
    }
    Ok(0)
}

fn cmd_prove(cli: &Cli) -> anyhow::Result<i32> {
    let resolved = resolve(cli)?;
    let policy = load_policy(&resolved.policy)?;
    let ledger = load_ledger(&resolved.ledger)?;
    let intents = load_intents(&resolved.intents)?;
    let settings = &resolved.anchor;

    let eth = match settings.anchoring() {
        Some((url, key)) => {
            let signer = LocalSigner::from_hex(key.expose()).context("load private key")?;
            info!(wallet = %signer.address(), "anchoring enabled");
            Some(
                EthAnchor::connect(url, RPC_REQUEST_TIMEOUT)
                    .context("connect to rpc")?
                    .with_signer(signer)
                    .with_chain_id(settings.chain_id)
                    .with_receipt_polling(settings.receipt_timeout, settings.poll_interval),
            )
        }
        None => {
            info!("anchoring not configured; digests only");
            None
        }
    };

    let output = run_prove(ProveInput {
        policy: &policy,
        ledger: &ledger,
        intents: &intents,
        now: OffsetDateTime::now_utc(),
        bucket_seconds: resolved.bucket_seconds,
        anchor_settings: settings,
        anchor: eth.as_ref().map(|a| a as &dyn Anchor),
    })?;

    let results_path = resolved.out_dir.join("results.json");
    let report_path = resolved.out_dir.join("report.md");
    write_json(&results_path, &output.results).context("write results")?;
    write_text(&report_path, &proof_markdown(&output.results)).context("write report")?;

    let anchored = output
        .results
        .results
        .iter()
        .filter(|r| r.proof.anchored)
        .count();
    println!(
        "Wrote {results_path} and {report_path} ({} results, {anchored} anchored)",
        output.results.results.len()
    );
    Ok(0)
}

fn cmd_verify(
    cli: &Cli,
    tx: Option<&str>,
    digest: Option<&str>,
    results: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let resolved = resolve(cli)?;
    let Some(url) = resolved.anchor.rpc_url.as_deref() else {
        eprintln!("spendguard: verify needs --rpc-url or SPENDGUARD_RPC_URL");
        return Ok(1);
    };
    let source = EthAnchor::connect(url, RPC_REQUEST_TIMEOUT).context("connect to rpc")?;

    match (tx, digest, results) {
        (Some(tx), Some(digest), None) => match verify_tx(&source, tx, digest) {
            Ok(outcome) => {
                match &outcome {
                    VerifyOutcome::Pass => println!("PASS {tx}"),
                    VerifyOutcome::Mismatch { actual } => {
                        println!("FAIL {tx} (expected {digest} got {actual})")
                    }
                    VerifyOutcome::NotFound => println!("NOT FOUND {tx}"),
                }
                Ok(verify_exit_code(&outcome))
            }
            Err(err @ AnchorError::InvalidHex { .. }) => {
                eprintln!("spendguard: {err}");
                Ok(1)
            }
            Err(err) => {
                eprintln!("spendguard: rpc failure: {err}");
                Ok(2)
            }
        },
        (None, None, Some(path)) => {
            let envelope = load_results(path)?;
            let summary = verify_results(&source, &envelope);
            print!("{}", format_summary(&summary));
            Ok(summary.exit_code())
        }
        _ => {
            eprintln!("spendguard: verify needs either --tx with --digest, or --results");
            Ok(1)
        }
    }
}

fn cmd_digest(cli: &Cli, intent: Option<&Utf8Path>, now: Option<u64>) -> anyhow::Result<i32> {
    let resolved = resolve(cli)?;
    let policy = load_policy(&resolved.policy)?;
    let ledger = load_ledger(&resolved.ledger)?;
    let intents = load_intents(intent.unwrap_or(resolved.intents.as_path()))?;
    let [intent] = intents.as_slice() else {
        anyhow::bail!("digest needs exactly one intent, found {}", intents.len());
    };
    let now_secs = match now {
        Some(secs) => secs,
        None => unix_secs(OffsetDateTime::now_utc())?,
    };

    let output = run_digest(DigestInput {
        policy: &policy,
        intent,
        ledger: &ledger,
        now_secs,
        bucket_seconds: resolved.bucket_seconds,
    })?;
    print_json(&output)?;
    Ok(0)
}

fn cmd_policy_from_text(text: &str, out: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let output = run_policy_from_text(text)?;
    info!(policy_hash = %output.policy_hash, "policy built from text");
    match out {
        Some(path) => {
            write_json(path, &output.policy).context("write policy")?;
            println!("Wrote {path} (policy_hash {})", output.policy_hash);
        }
        None => print_json(&output.policy)?,
    }
    Ok(0)
}

fn cmd_doctor(cli: &Cli) -> anyhow::Result<i32> {
    let resolved = resolve(cli)?;
    let settings = &resolved.anchor;
    let Some(url) = settings.rpc_url.as_deref() else {
        eprintln!("RPC FAIL: no rpc_url configured (set --rpc-url or SPENDGUARD_RPC_URL)");
        return Ok(2);
    };

    let wallet = settings
        .private_key
        .as_ref()
        .map(|key| LocalSigner::from_hex(key.expose()).map(|signer| signer.address()))
        .transpose()
        .context("load private key")?;

    let report = EthAnchor::connect(url, RPC_REQUEST_TIMEOUT)
        .map_err(anyhow::Error::from)
        .and_then(|chain| run_doctor(&chain, settings.chain_id, wallet.as_deref()));
    match report {
        Ok(report) => {
            print!("{}", format_doctor(&report));
            Ok(0)
        }
        Err(err) => {
            eprintln!("RPC FAIL: {err:#}");
            Ok(2)
        }
    }
}

fn cmd_explain(identifier: &str) -> anyhow::Result<i32> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", spendguard_app::format_explanation(&exp));
            Ok(0)
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                spendguard_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            Ok(1)
        }
    }
}
