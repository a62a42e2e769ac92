//! Reconciliation intents and their caller-facing outcome

use serde::{Deserialize, Serialize};

use super::api::{ApiRecord, ApiSpec};

/// The single action that converges the gateway toward the desired state.
///
/// Computed fresh on every reconciliation and consumed once by execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Gateway already matches; carries the record it reported
    NoOp(ApiRecord),
    /// No registration with this name exists
    Create(ApiSpec),
    /// Registration exists but at least one managed field differs
    Update { id: String, spec: ApiSpec },
    /// Registration must be removed
    Delete { id: String },
}

impl Intent {
    /// Lowercase label used in logs and plan output
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::NoOp(_) => "noop",
            Intent::Create(_) => "create",
            Intent::Update { .. } => "update",
            Intent::Delete { .. } => "delete",
        }
    }

    /// Whether executing this intent mutates the gateway
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Intent::NoOp(_))
    }
}

/// Result surfaced to the caller after an intent has been executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub changed: bool,
    pub meta: serde_json::Value,
}

impl Outcome {
    pub fn changed(meta: serde_json::Value) -> Self {
        Self { changed: true, meta }
    }

    pub fn unchanged(meta: serde_json::Value) -> Self {
        Self { changed: false, meta }
    }
}
