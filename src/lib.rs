//! # kongsync
//!
//! Reconciles a declared API registration against the live state of a
//! gateway's admin API, issuing a create, update or delete only when the
//! gateway has drifted from what was declared.
//!
//! ## Architecture
//!
//! ```text
//! ApiSpec ──► Reconciler ──► Intent ──► execute ──► Outcome
//!                 │                        │
//!             ApiLookup               ApiExecutor
//!          (list, get by id)    (create, update, delete)
//! ```
//!
//! - **Comparator** (`reconcile::compare`): per-field equivalence, tolerant of
//!   the escaped strings the gateway echoes back
//! - **Reconciler** (`reconcile::Reconciler`): reads the gateway and decides
//!   on exactly one intent
//! - **Client** (`cli::client::GatewayClient`): `reqwest` implementation of
//!   both collaborators
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kongsync::cli::client::{ClientConfig, GatewayClient};
//! use kongsync::{ensure_present, ApiSpec, Reconciler, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = GatewayClient::new(ClientConfig::default())?;
//!     let reconciler = Reconciler::new(client.clone());
//!
//!     let spec = ApiSpec::new("Mockbin", "http://mockbin.com").with_hosts(["mockbin.com"]);
//!     let outcome = ensure_present(&spec, &reconciler, &client).await?;
//!     println!("changed: {}", outcome.changed);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod errors;
pub mod reconcile;

// Re-export commonly used types and traits
pub use domain::{ApiRecord, ApiSpec, Intent, ManagedField, Outcome};
pub use errors::{Error, Result};
pub use reconcile::{ensure_absent, ensure_present, execute, ApiExecutor, ApiLookup, Reconciler};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "kongsync");
    }
}
