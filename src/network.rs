//! Network - which chain we publish to, and where its public endpoints live

use crate::core::paths::endpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network { Bitcoin, #[default] Testnet, Signet, Regtest }

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self { Network::Bitcoin => "bitcoin", Network::Testnet => "testnet", Network::Signet => "signet", Network::Regtest => "regtest" }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "mainnet" | "main" => Some(Network::Bitcoin),
            "testnet" | "test" | "testnet3" => Some(Network::Testnet),
            "signet" => Some(Network::Signet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }

    pub fn to_bitcoin(&self) -> bitcoin::Network {
        match self { Network::Bitcoin => bitcoin::Network::Bitcoin, Network::Testnet => bitcoin::Network::Testnet, Network::Signet => bitcoin::Network::Signet, Network::Regtest => bitcoin::Network::Regtest }
    }

    /// Esplora API base (no trailing slash). Raw transactions are POSTed to `{base}/tx`.
    pub fn default_esplora_url(&self) -> &'static str {
        match self {
            Network::Bitcoin => endpoints::ESPLORA_MAINNET,
            Network::Testnet => endpoints::ESPLORA_TESTNET,
            Network::Signet => endpoints::ESPLORA_SIGNET,
            Network::Regtest => endpoints::ESPLORA_REGTEST,
        }
    }

    pub fn default_electrum_url(&self) -> &'static str {
        match self {
            Network::Bitcoin => endpoints::ELECTRUM_MAINNET,
            Network::Testnet => endpoints::ELECTRUM_TESTNET,
            Network::Signet => endpoints::ELECTRUM_SIGNET,
            Network::Regtest => endpoints::ELECTRUM_REGTEST,
        }
    }

    /// Block explorer transaction page prefix. Regtest has none.
    pub fn default_explorer_url(&self) -> Option<&'static str> {
        match self {
            Network::Bitcoin => Some(endpoints::EXPLORER_MAINNET),
            Network::Testnet => Some(endpoints::EXPLORER_TESTNET),
            Network::Signet => Some(endpoints::EXPLORER_SIGNET),
            Network::Regtest => None,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}
