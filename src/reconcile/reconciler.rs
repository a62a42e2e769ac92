//! API reconciler - decides how to converge a gateway registration.

use tracing::{debug, info, instrument};

use super::compare::first_mismatch;
use super::ApiLookup;
use crate::domain::{ApiSpec, Intent};
use crate::errors::{Error, Result};

/// Computes the intent that converges the gateway toward a desired spec.
///
/// Every call re-reads the gateway; nothing is cached between calls. There
/// is no locking against the gateway either, so two concurrent
/// reconciliations of the same name can both decide to create. Callers that
/// run in parallel must serialize per name themselves.
pub struct Reconciler<L> {
    lookup: L,
}

impl<L: ApiLookup> Reconciler<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Decide between create, update and no-op for `desired`.
    ///
    /// Lookup failures propagate unchanged.
    #[instrument(skip(self, desired), fields(api = %desired.name))]
    pub async fn reconcile(&self, desired: &ApiSpec) -> Result<Intent> {
        let Some(summary) = self.lookup.find_by_name(&desired.name).await? else {
            info!("API not registered, will create");
            return Ok(Intent::Create(desired.clone()));
        };

        // listing entries can be partial
        let actual = self.lookup.get_api(&summary.id).await?;

        match first_mismatch(desired, &actual) {
            Some(field) => {
                debug!(field = %field, id = %actual.id, "Field differs from gateway");
                info!(id = %actual.id, "API out of date, will update");
                Ok(Intent::Update { id: actual.id, spec: desired.clone() })
            }
            None => {
                info!(id = %actual.id, "API up to date");
                Ok(Intent::NoOp(actual))
            }
        }
    }

    /// Resolve `name` to a delete intent; an unknown name is `NotFound`.
    #[instrument(skip(self))]
    pub async fn reconcile_delete(&self, name: &str) -> Result<Intent> {
        match self.lookup.find_by_name(name).await? {
            Some(summary) => {
                info!(id = %summary.id, "API registered, will delete");
                Ok(Intent::Delete { id: summary.id })
            }
            None => Err(Error::not_found(name)),
        }
    }
}
