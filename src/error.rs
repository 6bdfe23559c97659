//! Error taxonomy for the broadcast pipeline.
//!
//! Each variant is handled by the layer that detects it. Only `Rejected` and
//! `Network` are recoverable (they route to the fallback signer); `Cleanup` is
//! swallowed after a successful broadcast.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("no pending transaction found at {0}")]
    MissingRecord(String),

    #[error("pending transaction is malformed: {0}")]
    MalformedRecord(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("transaction missing: {0}")]
    MissingTransactionField(&'static str),

    #[error("broadcast rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("cleanup failed: {0}")]
    Cleanup(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BroadcastError {
    /// True for errors that come from the record itself (nothing was attempted).
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRecord(_)
                | Self::MalformedRecord(_)
                | Self::MissingField(_)
                | Self::MissingTransactionField(_)
        )
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::MissingRecord(_) => 3,
            Self::MalformedRecord(_) => 4,
            Self::MissingField(_) | Self::MissingTransactionField(_) => 5,
            Self::Rejected { .. } | Self::Network(_) | Self::Signing(_) | Self::Cleanup(_) => 6,
        }
    }
}

pub type BroadcastResult<T> = Result<T, BroadcastError>;
