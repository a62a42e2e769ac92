//! # Error Handling
//!
//! Error types for gateway reconciliation, built on `thiserror`.

mod types;

pub use types::{Error, Result};
