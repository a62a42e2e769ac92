//! Domain layer
//!
//! Pure data types for API registrations with no HTTP or CLI dependencies.
//!
//! ## Module Organization
//!
//! - `api`: desired spec, gateway record and listing types
//! - `field`: the enumeration of managed fields and borrowed field values
//! - `intent`: the action a reconciliation decides on, and its outcome

pub mod api;
pub mod field;
pub mod intent;

pub use api::{ApiListing, ApiRecord, ApiSpec, ApiSummary};
pub use field::{FieldValue, ManagedField};
pub use intent::{Intent, Outcome};
