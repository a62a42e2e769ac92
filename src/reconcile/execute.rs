//! Intent execution
//!
//! Carries out an [`Intent`] against an [`ApiExecutor`] and reports the
//! caller-facing [`Outcome`]. Failures surface as-is; nothing is retried and
//! nothing is rolled back.

use serde_json::json;
use tracing::{info, instrument};

use super::{ApiExecutor, ApiLookup, Reconciler};
use crate::domain::{ApiSpec, Intent, Outcome};
use crate::errors::Result;

/// Execute `intent`, consuming it.
#[instrument(skip_all, fields(intent = intent.kind()))]
pub async fn execute<E: ApiExecutor + ?Sized>(intent: Intent, executor: &E) -> Result<Outcome> {
    match intent {
        Intent::NoOp(record) => Ok(Outcome::unchanged(record.to_json()?)),
        Intent::Create(spec) => {
            let created = executor.create_api(&spec).await?;
            info!(id = %created.id, api = %created.name, "Created API");
            Ok(Outcome::changed(created.to_json()?))
        }
        Intent::Update { id, spec } => {
            let updated = executor.update_api(&id, &spec).await?;
            info!(id = %updated.id, api = %updated.name, "Updated API");
            Ok(Outcome::changed(updated.to_json()?))
        }
        Intent::Delete { id } => {
            executor.delete_api(&id).await?;
            info!(id = %id, "Deleted API");
            Ok(Outcome::changed(json!({})))
        }
    }
}

/// Make sure an API matching `spec` is registered.
pub async fn ensure_present<L, E>(
    spec: &ApiSpec,
    reconciler: &Reconciler<L>,
    executor: &E,
) -> Result<Outcome>
where
    L: ApiLookup,
    E: ApiExecutor + ?Sized,
{
    spec.validate()?;
    let intent = reconciler.reconcile(spec).await?;
    execute(intent, executor).await
}

/// Make sure no API named `name` is registered. Unknown names are an error.
pub async fn ensure_absent<L, E>(name: &str, reconciler: &Reconciler<L>, executor: &E) -> Result<Outcome>
where
    L: ApiLookup,
    E: ApiExecutor + ?Sized,
{
    let intent = reconciler.reconcile_delete(name).await?;
    execute(intent, executor).await
}
