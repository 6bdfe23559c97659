//! txpush CLI - publish the pending transaction
//!
//!   txpush [broadcast]     → raw broadcast, fallback signing, cleanup
//!   txpush check           → load + validate only, print details as JSON
//!
//! Configuration (flags override environment, environment overrides defaults):
//!   --pending <path>    TXPUSH_PENDING_FILE
//!   --network <net>     TXPUSH_NETWORK
//!   --esplora <url>     TXPUSH_ESPLORA
//!   --electrum <url>    TXPUSH_ELECTRUM
//!   --explorer <url>    TXPUSH_EXPLORER
//!   --timeout <secs>    TXPUSH_TIMEOUT_SECS
//!
//! Exit codes: 0 broadcast, 2 usage/config, 3 no record, 4 malformed record,
//! 5 missing field, 6 every broadcast path failed.

use serde_json::{json, Value};
use std::env;
use std::io::{self, IsTerminal};
use std::time::Duration;
use tracing::debug;
use txpush::broadcast::fallback::{fee_policy, signing_identity, single_output};
use txpush::logging::init_logging;
use txpush::{BroadcasterConfig, ElectrumSigner, Network, Orchestrator, Outcome};

const USAGE_EXIT: i32 = 2;

fn main() {
    init_logging();
    #[cfg(feature = "wallet")]
    let _ = rustls::crypto::ring::default_provider().install_default();

    let args: Vec<String> = env::args().skip(1).collect();
    let opts = ParsedArgs::parse(&args);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("txpush {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let config = match opts.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(USAGE_EXIT);
        }
    };
    debug!(network = %config.network, pending = %config.pending_path.display(), "Configuration loaded");

    let code = match opts.command.as_deref() {
        None | Some("broadcast") | Some("send") => cmd_broadcast(&config),
        Some("check") => cmd_check(&config, opts.pretty),
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            USAGE_EXIT
        }
    };
    std::process::exit(code);
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    pending: Option<String>,
    network: Option<String>,
    esplora_url: Option<String>,
    electrum_url: Option<String>,
    explorer_url: Option<String>,
    timeout_secs: Option<String>,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        // Load .env file if present
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if !value.is_empty() && env::var(key.trim()).is_err() {
                        env::set_var(key.trim(), value);
                    }
                }
            }
        }

        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let value = args.get(i + 1).cloned();
            let mut takes_value = |slot: &mut Option<String>| {
                if value.is_some() {
                    *slot = value.clone();
                    i += 1;
                }
            };
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--pretty" => opts.pretty = true,
                "--pending" | "-f" => takes_value(&mut opts.pending),
                "--network" | "-n" => takes_value(&mut opts.network),
                "--esplora" | "-e" => takes_value(&mut opts.esplora_url),
                "--electrum" => takes_value(&mut opts.electrum_url),
                "--explorer" => takes_value(&mut opts.explorer_url),
                "--timeout" | "-t" => takes_value(&mut opts.timeout_secs),
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        opts
    }

    /// Environment first, then flags on top.
    fn config(&self) -> Result<BroadcasterConfig, String> {
        let mut config = BroadcasterConfig::from_env().map_err(|e| e.to_string())?;
        if let Some(raw) = self.network.as_deref() {
            let network = Network::parse(raw).ok_or_else(|| format!("Invalid network: {}", raw))?;
            config.network = network;
        }
        if let Some(path) = &self.pending { config = config.with_pending_path(path); }
        if let Some(url) = &self.esplora_url { config = config.with_esplora(url); }
        if let Some(url) = &self.electrum_url { config = config.with_electrum(url); }
        if let Some(url) = &self.explorer_url { config = config.with_explorer(url); }
        if let Some(raw) = &self.timeout_secs {
            let secs: u64 = raw.parse().map_err(|_| format!("Invalid timeout: {}", raw))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn print_usage() {
    println!(
        r#"txpush - Broadcast a pending Bitcoin transaction

USAGE:
    txpush [command] [options]

COMMANDS:
    broadcast               Broadcast the pending record (default)
    check                   Validate the pending record, no network access

OPTIONS:
    --pending, -f <path>    Pending record (default: ./pending_transaction.json)
    --network, -n <net>     Network: bitcoin|testnet|signet|regtest (default: testnet)
    --esplora, -e <url>     Esplora API base for raw broadcast
    --electrum <url>        Electrum server for the fallback signer
    --explorer <url>        Explorer tx URL prefix
    --timeout, -t <secs>    Raw broadcast timeout (default: 30)
    --pretty                Pretty-print JSON (check)
    --version, -V           Print version

ENVIRONMENT:
    TXPUSH_PENDING_FILE, TXPUSH_NETWORK, TXPUSH_ESPLORA, TXPUSH_ELECTRUM,
    TXPUSH_EXPLORER, TXPUSH_TIMEOUT_SECS, TXPUSH_LOG_JSON=1, RUST_LOG

EXIT CODES:
    0 broadcast   2 usage/config   3 no record   4 malformed record
    5 missing field   6 broadcast failed
"#
    );
}

fn cmd_broadcast(config: &BroadcasterConfig) -> i32 {
    println!("{}", "=".repeat(60));
    println!("BITCOIN {} - BROADCAST TRANSACTION", config.network.as_str().to_uppercase());
    println!("{}", "=".repeat(60));

    let orchestrator = match Orchestrator::from_config(config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return e.exit_code();
        }
    };
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return USAGE_EXIT;
        }
    };

    let outcome = rt.block_on(orchestrator.run());
    match &outcome {
        Outcome::Broadcast { txid, path } => {
            println!("Transaction successfully broadcast ({}): {}", path.as_str(), txid);
            if let Some(link) = config.explorer_link(txid) {
                println!("Explorer: {}", link);
            }
        }
        Outcome::NotBroadcast { error, .. } if error.is_record_error() => println!("Nothing broadcast: {}", error),
        Outcome::NotBroadcast { error, .. } => println!("Broadcast failed: {}", error),
    }
    outcome.exit_code()
}

fn cmd_check(config: &BroadcasterConfig, pretty: bool) -> i32 {
    let orchestrator = match Orchestrator::from_config(config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return e.exit_code();
        }
    };
    let record = match orchestrator.load_validated() {
        Ok(record) => record,
        Err((_, e)) => {
            println!("{}", json!({"valid": false, "error": e.to_string()}));
            return e.exit_code();
        }
    };

    let tx = &record.transaction;
    let spending_address = signing_identity(record.private_key_wif.as_ref(), config.network).and_then(|key| {
        single_output(tx)?;
        fee_policy(tx.fee())?;
        ElectrumSigner::spending_address(&key, tx.from_address().unwrap_or_default(), config.network)
    });
    let first_path = if record.raw_hex().is_some() { "raw" } else { "fallback" };
    let fallback = match spending_address {
        Ok(address) => json!({"ready": true, "spends_from": address}),
        Err(e) => json!({"ready": false, "error": e.to_string()}),
    };
    let output = json!({
        "valid": true,
        "network": config.network.as_str(),
        "from": tx.from_address,
        "to": tx.to_address,
        "amount_sats": tx.amount_sats,
        "amount_btc": tx.amount_btc(),
        "fee_sats": tx.fee().cloned().unwrap_or(json!(0)),
        "signed": record.is_signed(),
        "raw_transaction": record.raw_hex().is_some(),
        "first_path": first_path,
        "fallback": fallback,
    });
    print_json(&output, pretty);
    0
}

fn print_json(value: &Value, pretty: bool) {
    let formatted = if pretty || io::stdout().is_terminal() {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match formatted {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format output: {}", e),
    }
}
