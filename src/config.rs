//! Broadcaster configuration - built by the binary from flags and environment

use std::path::PathBuf;
use std::time::Duration;

use crate::core::paths::{env as vars, pending};
use crate::error::{BroadcastError, BroadcastResult};
use crate::network::Network;
use crate::wallet::DEFAULT_STOP_GAP;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BroadcasterConfig {
    pub network: Network,
    pub pending_path: PathBuf,
    /// Esplora API base; `None` → network default.
    pub esplora_url: Option<String>,
    /// Electrum server for the fallback signer; `None` → network default.
    pub electrum_url: Option<String>,
    /// Explorer tx page prefix; `None` → network default.
    pub explorer_url: Option<String>,
    pub timeout: Duration,
    pub stop_gap: usize,
}

impl Default for BroadcasterConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            pending_path: PathBuf::from(pending::FILE_NAME),
            esplora_url: None,
            electrum_url: None,
            explorer_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stop_gap: DEFAULT_STOP_GAP,
        }
    }
}

impl BroadcasterConfig {
    pub fn new(network: Network) -> Self { Self { network, ..Default::default() } }
    pub fn with_pending_path(mut self, path: impl Into<PathBuf>) -> Self { self.pending_path = path.into(); self }
    pub fn with_esplora(mut self, url: impl Into<String>) -> Self { self.esplora_url = Some(url.into()); self }
    pub fn with_electrum(mut self, url: impl Into<String>) -> Self { self.electrum_url = Some(url.into()); self }
    pub fn with_explorer(mut self, url: impl Into<String>) -> Self { self.explorer_url = Some(url.into()); self }
    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }
    pub fn with_stop_gap(mut self, stop_gap: usize) -> Self { self.stop_gap = stop_gap; self }

    /// Read `TXPUSH_*` variables. Unset or empty variables keep defaults.
    pub fn from_env() -> BroadcastResult<Self> {
        let var = |key: &str| std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let network = match var(vars::NETWORK) {
            Some(raw) => Network::parse(&raw).ok_or_else(|| BroadcastError::Config(format!("unknown network: {}", raw)))?,
            None => Network::default(),
        };
        let mut config = Self::new(network);
        if let Some(path) = var(vars::PENDING_FILE) { config = config.with_pending_path(path); }
        if let Some(url) = var(vars::ESPLORA) { config = config.with_esplora(url); }
        if let Some(url) = var(vars::ELECTRUM) { config = config.with_electrum(url); }
        if let Some(url) = var(vars::EXPLORER) { config = config.with_explorer(url); }
        if let Some(raw) = var(vars::TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| BroadcastError::Config(format!("invalid timeout: {}", raw)))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BroadcastResult<()> {
        if self.timeout.is_zero() {
            return Err(BroadcastError::Config("timeout must be greater than zero".into()));
        }
        if self.stop_gap == 0 {
            return Err(BroadcastError::Config("stop gap must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn esplora_url(&self) -> &str { self.esplora_url.as_deref().unwrap_or(self.network.default_esplora_url()) }

    pub fn electrum_url(&self) -> &str { self.electrum_url.as_deref().unwrap_or(self.network.default_electrum_url()) }

    pub fn explorer_url(&self) -> Option<&str> { self.explorer_url.as_deref().or(self.network.default_explorer_url()) }

    /// Explorer link for `txid`, if the network has an explorer.
    pub fn explorer_link(&self, txid: &str) -> Option<String> { self.explorer_url().map(|base| format!("{}{}", base, txid)) }
}
