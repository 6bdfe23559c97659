//! Broadcast paths: pre-signed raw hex over HTTP, or local signing as fallback.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator
//!     │
//!     ├── RawBroadcaster (trait) ── EsploraBroadcaster ── POST {esplora}/tx
//!     │
//!     └── FallbackBroadcaster
//!             │  WIF → PrivateKey, to_address/amount → PaymentOutput
//!             ▼
//!         SigningCapability (trait) ── ElectrumSigner (BDK, feature = "wallet")
//! ```
//!
//! Both traits are the injection seams for tests.

pub mod fallback;
pub mod raw;

use async_trait::async_trait;
use bitcoin::{Amount, PrivateKey};

use crate::core::amount::btc;
use crate::error::BroadcastResult;

pub use fallback::FallbackBroadcaster;
pub use raw::EsploraBroadcaster;

/// Which path published the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastPath {
    Raw,
    Fallback,
}

impl BroadcastPath {
    pub fn as_str(&self) -> &'static str {
        match self { BroadcastPath::Raw => "raw", BroadcastPath::Fallback => "fallback" }
    }
}

/// One (destination, amount) pair of a spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutput {
    pub destination: String,
    pub amount: Amount,
}

impl PaymentOutput {
    pub fn new(destination: impl Into<String>, amount: Amount) -> Self {
        Self { destination: destination.into(), amount }
    }

    /// Amount in BTC, eight decimals.
    pub fn amount_btc(&self) -> String { btc(self.amount) }

    pub fn unit(&self) -> &'static str { "btc" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePolicy {
    /// Let the signer pick a rate.
    Estimate,
    /// Exact fee for the whole transaction.
    Absolute(Amount),
}

/// Everything the signing capability needs to build, sign and submit a spend.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    pub key: PrivateKey,
    /// Address the funds are spent from. Picks the script type of the key.
    pub source_address: String,
    pub outputs: Vec<PaymentOutput>,
    pub fee: FeePolicy,
}

/// Submits an already-signed transaction.
#[async_trait]
pub trait RawBroadcaster: Send + Sync {
    /// Returns the txid reported by the endpoint.
    async fn broadcast(&self, raw_hex: &str) -> BroadcastResult<String>;
}

/// Signs with a held key and submits. Opaque to the orchestrator.
#[async_trait]
pub trait SigningCapability: Send + Sync {
    fn name(&self) -> &str;
    async fn sign_and_send(&self, request: SigningRequest) -> BroadcastResult<String>;
}
