//! Pending transaction record: storage, schema and validation.
//!
//! ```text
//! pending_transaction.json ──load()──▶ serde_json::Value
//!                                          │
//!                                   validate() (presence, then loose decode)
//!                                          │
//!                                          ▼
//!                                  PendingTransaction
//! ```

mod record;
mod store;
pub mod validate;

pub use record::{display_value, whole_sats, PendingTransaction, SecretWif, TransferDetails};
pub use store::PendingStore;
pub use validate::validate;
