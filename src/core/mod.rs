//! Shared constants and unit helpers

pub mod amount;
pub mod paths;
