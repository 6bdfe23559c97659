//! txpush: publish a pending Bitcoin transaction, raw first, signed locally as fallback.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator (entry point)
//!   │
//!   ├── PendingStore ── pending_transaction.json (load / delete)
//!   │
//!   ├── validate() ── fail-fast presence checks → PendingTransaction
//!   │
//!   ├── RawBroadcaster ── EsploraBroadcaster (POST {esplora}/tx)
//!   │
//!   └── FallbackBroadcaster
//!         └── SigningCapability ── ElectrumSigner (BDK single-key wallet)
//! ```
//!
//! # Record
//!
//! | Field | Required | Use |
//! |-------|----------|-----|
//! | `transaction.from_address` | yes | fallback script type |
//! | `transaction.to_address` | yes | fallback destination |
//! | `transaction.amount_sats` | yes | fallback amount |
//! | `transaction.fee_sats` | no | absolute fallback fee (0 = estimate) |
//! | `private_key_wif` | yes | fallback signing key |
//! | `address` | yes | informational |
//! | `signature` | no | reported only |
//! | `raw_transaction_hex` | no | raw broadcast payload |
//!
//! # Features
//!
//! - `wallet` (default) - BDK + Electrum fallback signer
//!
//! # Usage
//!
//! ```ignore
//! use txpush::{BroadcasterConfig, Network, Orchestrator};
//!
//! let config = BroadcasterConfig::new(Network::Testnet).with_pending_path("pending_transaction.json");
//! let outcome = Orchestrator::from_config(&config)?.run().await;
//! if let Some(txid) = outcome.txid() {
//!     println!("{}", txid);
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod network;
pub mod orchestrator;
pub mod pending;
pub mod wallet;

pub use broadcast::{BroadcastPath, EsploraBroadcaster, FallbackBroadcaster, FeePolicy, PaymentOutput, RawBroadcaster, SigningCapability, SigningRequest};
pub use config::BroadcasterConfig;
pub use error::{BroadcastError, BroadcastResult};
pub use network::Network;
pub use orchestrator::{Orchestrator, Outcome, Stage};
pub use pending::{PendingStore, PendingTransaction, SecretWif, TransferDetails};
pub use wallet::ElectrumSigner;
