//! Orchestrator - one pass over the pending record
//!
//! ```text
//! Idle ─load─▶ Loaded ─validate─▶ Validated ─raw hex?─▶ RawAttempted ──ok──┐
//!   │            │                    │                      │ err          │
//!   ▼            ▼                    └──────────────▶ FallbackAttempted ─ok─┤
//! Failed ◀───────┴──────────────────────────────────────────── err           ▼
//!                                                                         Cleaned
//! ```
//!
//! Runs once; nothing loops or retries. A failed run leaves the record in
//! place so the operator can inspect it and run again.

use tracing::{debug, error, info, warn};

use crate::broadcast::{BroadcastPath, EsploraBroadcaster, FallbackBroadcaster, RawBroadcaster};
use crate::config::BroadcasterConfig;
use crate::error::{BroadcastError, BroadcastResult};
use crate::pending::{display_value, validate, PendingStore, PendingTransaction};
use crate::wallet::ElectrumSigner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage { Idle, Loaded, Validated, RawAttempted, FallbackAttempted, Cleaned, Failed }

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Loaded => "loaded",
            Stage::Validated => "validated",
            Stage::RawAttempted => "raw_attempted",
            Stage::FallbackAttempted => "fallback_attempted",
            Stage::Cleaned => "cleaned",
            Stage::Failed => "failed",
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Broadcast { txid: String, path: BroadcastPath },
    /// `stage` is the last stage reached before failing.
    NotBroadcast { stage: Stage, error: BroadcastError },
}

impl Outcome {
    pub fn is_success(&self) -> bool { matches!(self, Outcome::Broadcast { .. }) }

    pub fn txid(&self) -> Option<&str> {
        match self { Outcome::Broadcast { txid, .. } => Some(txid), Outcome::NotBroadcast { .. } => None }
    }

    pub fn exit_code(&self) -> i32 {
        match self { Outcome::Broadcast { .. } => 0, Outcome::NotBroadcast { error, .. } => error.exit_code() }
    }
}

pub struct Orchestrator {
    store: PendingStore,
    raw: Box<dyn RawBroadcaster>,
    fallback: FallbackBroadcaster,
    explorer_url: Option<String>,
}

impl Orchestrator {
    pub fn new(store: PendingStore, raw: Box<dyn RawBroadcaster>, fallback: FallbackBroadcaster) -> Self {
        Self { store, raw, fallback, explorer_url: None }
    }

    pub fn with_explorer(mut self, url: impl Into<String>) -> Self { self.explorer_url = Some(url.into()); self }

    /// Esplora raw broadcaster + Electrum fallback signer, as configured.
    pub fn from_config(config: &BroadcasterConfig) -> BroadcastResult<Self> {
        config.validate()?;
        let raw = EsploraBroadcaster::new(config.esplora_url(), config.timeout)?;
        let signer = ElectrumSigner::new(config.electrum_url(), config.network).with_stop_gap(config.stop_gap);
        let fallback = FallbackBroadcaster::new(Box::new(signer), config.network);
        let orchestrator = Self::new(PendingStore::new(&config.pending_path), Box::new(raw), fallback);
        Ok(match config.explorer_url() {
            Some(url) => orchestrator.with_explorer(url),
            None => orchestrator,
        })
    }

    pub fn store(&self) -> &PendingStore { &self.store }

    /// Load and validate without any network action.
    pub fn load_validated(&self) -> Result<PendingTransaction, (Stage, BroadcastError)> {
        let value = self.store.load().map_err(|e| (Stage::Idle, e))?;
        enter(Stage::Loaded);
        let record = validate(&value).map_err(|e| (Stage::Loaded, e))?;
        enter(Stage::Validated);
        Ok(record)
    }

    pub async fn run(&self) -> Outcome {
        enter(Stage::Idle);
        let record = match self.load_validated() {
            Ok(record) => record,
            Err((stage, error)) => return self.fail(stage, error),
        };
        report_details(&record, self.fallback.network().as_str());

        if let Some(raw_hex) = record.raw_hex() {
            enter(Stage::RawAttempted);
            info!(bytes = raw_hex.len() / 2, "Attempting raw broadcast of pre-signed transaction");
            match self.raw.broadcast(raw_hex).await {
                Ok(txid) if !txid.trim().is_empty() => return self.finish(txid, BroadcastPath::Raw),
                Ok(_) => warn!("Raw broadcast returned no txid, using fallback signer"),
                Err(e) => warn!(error = %e, "Raw broadcast failed, using fallback signer"),
            }
        }

        enter(Stage::FallbackAttempted);
        info!("Using fallback broadcast");
        let tx = &record.transaction;
        match self.fallback.sign_and_broadcast(tx, record.private_key_wif.as_ref(), tx.fee()).await {
            Ok(txid) => self.finish(txid, BroadcastPath::Fallback),
            Err(e) => self.fail(Stage::FallbackAttempted, e),
        }
    }

    fn finish(&self, txid: String, path: BroadcastPath) -> Outcome {
        match self.explorer_url.as_deref() {
            Some(base) => info!(txid = %txid, path = path.as_str(), explorer = %format!("{}{}", base, txid), "Transaction broadcast"),
            None => info!(txid = %txid, path = path.as_str(), "Transaction broadcast"),
        }
        self.store.delete();
        enter(Stage::Cleaned);
        Outcome::Broadcast { txid, path }
    }

    fn fail(&self, stage: Stage, error: BroadcastError) -> Outcome {
        match &error {
            BroadcastError::MissingRecord(_) => warn!(error = %error, "Nothing to broadcast"),
            _ => error!(stage = stage.as_str(), error = %error, "Broadcast failed"),
        }
        enter(Stage::Failed);
        Outcome::NotBroadcast { stage, error }
    }
}

fn enter(stage: Stage) { debug!(stage = stage.as_str(), "Orchestrator stage"); }

fn report_details(record: &PendingTransaction, network: &str) {
    let tx = &record.transaction;
    info!(
        network,
        from = %display_value(&tx.from_address),
        to = %display_value(&tx.to_address),
        amount_sats = %display_value(&tx.amount_sats),
        amount_btc = %tx.amount_btc().unwrap_or_else(|| "?".into()),
        fee_sats = %tx.fee().map(display_value).unwrap_or_else(|| "0".into()),
        signed = if record.is_signed() { "yes" } else { "no" },
        raw = record.raw_hex().is_some(),
        "Transaction details"
    );
}
