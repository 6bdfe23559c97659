//! Wallet module - fallback signing via BDK 2.x
//!
//! ```text
//! FallbackBroadcaster
//!     │  SigningRequest { key, source_address, outputs, fee }
//!     ▼
//! ElectrumSigner (SigningCapability)
//!     │  spawn_blocking
//!     ▼
//! descriptor_for(key) → Wallet::create_single → full_scan (Electrum)
//!     → build_tx → sign → transaction_broadcast (Electrum)
//! ```
//!
//! Nothing is persisted; each run scans the single key from scratch.

mod signer;

pub use signer::{descriptor_for, sat_per_vb_from_btc_per_kvb, ElectrumSigner, DEFAULT_STOP_GAP};
