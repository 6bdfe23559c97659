//! Path, endpoint and environment constants
//!
//! Centralized registry so the binary, config and tests agree on names.

/// Pending record location
pub mod pending {
    /// Default file name, resolved against the working directory.
    pub const FILE_NAME: &str = "pending_transaction.json";
}

/// Public endpoints per network
pub mod endpoints {
    pub const ESPLORA_MAINNET: &str = "https://blockstream.info/api";
    pub const ESPLORA_TESTNET: &str = "https://blockstream.info/testnet/api";
    pub const ESPLORA_SIGNET: &str = "https://mempool.space/signet/api";
    pub const ESPLORA_REGTEST: &str = "http://127.0.0.1:3002";

    /// Raw transaction submission path under the Esplora base.
    pub const TX_SUFFIX: &str = "/tx";

    pub const ELECTRUM_MAINNET: &str = "ssl://electrum.blockstream.info:50002";
    pub const ELECTRUM_TESTNET: &str = "ssl://electrum.blockstream.info:60002";
    pub const ELECTRUM_SIGNET: &str = "ssl://mempool.space:60602";
    pub const ELECTRUM_REGTEST: &str = "tcp://127.0.0.1:60401";

    pub const EXPLORER_MAINNET: &str = "https://blockstream.info/tx/";
    pub const EXPLORER_TESTNET: &str = "https://blockstream.info/testnet/tx/";
    pub const EXPLORER_SIGNET: &str = "https://mempool.space/signet/tx/";
}

/// Environment variables read by `BroadcasterConfig::from_env`
pub mod env {
    pub const NETWORK: &str = "TXPUSH_NETWORK";
    pub const PENDING_FILE: &str = "TXPUSH_PENDING_FILE";
    pub const ESPLORA: &str = "TXPUSH_ESPLORA";
    pub const ELECTRUM: &str = "TXPUSH_ELECTRUM";
    pub const EXPLORER: &str = "TXPUSH_EXPLORER";
    pub const TIMEOUT_SECS: &str = "TXPUSH_TIMEOUT_SECS";
    pub const LOG_JSON: &str = "TXPUSH_LOG_JSON";
}
