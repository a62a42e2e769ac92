//! Reconciliation of API registrations.
//!
//! The reconciler compares desired state (an [`ApiSpec`]) with the state the
//! gateway reports and decides on a single [`Intent`]. It only ever reads
//! from the gateway; mutations happen when the intent is executed.
//!
//! [`Intent`]: crate::domain::Intent

pub mod compare;
pub mod execute;
pub mod reconciler;

use async_trait::async_trait;

use crate::domain::{ApiRecord, ApiSpec, ApiSummary};
use crate::errors::Result;

pub use compare::{equivalent, equivalent_by_name, first_mismatch};
pub use execute::{ensure_absent, ensure_present, execute};
pub use reconciler::Reconciler;

/// Read access to the gateway's registrations.
///
/// The admin API offers listing and lookup-by-id only, so finding a
/// registration by name is a list followed by a linear scan.
#[async_trait]
pub trait ApiLookup: Send + Sync {
    /// List registrations (first page only)
    async fn list_apis(&self) -> Result<Vec<ApiSummary>>;

    /// Fetch the full record for a registration
    async fn get_api(&self, id: &str) -> Result<ApiRecord>;

    /// Find a registration by exact name
    async fn find_by_name(&self, name: &str) -> Result<Option<ApiSummary>> {
        let apis = self.list_apis().await?;
        Ok(apis.into_iter().find(|api| api.name.as_deref() == Some(name)))
    }
}

/// Mutating calls used to carry out an intent.
#[async_trait]
pub trait ApiExecutor: Send + Sync {
    async fn create_api(&self, spec: &ApiSpec) -> Result<ApiRecord>;

    async fn update_api(&self, id: &str, spec: &ApiSpec) -> Result<ApiRecord>;

    async fn delete_api(&self, id: &str) -> Result<()>;
}

/// In-memory gateway used by unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::errors::Error;

    #[derive(Debug, Clone, Default)]
    pub struct FakeGateway {
        records: Arc<Mutex<Vec<ApiRecord>>>,
        calls: Arc<Mutex<Vec<String>>>,
        next_id: Arc<Mutex<u32>>,
        fail_lookups: bool,
    }

    impl FakeGateway {
        pub fn with_records(records: Vec<ApiRecord>) -> Self {
            let next_id = records.len() as u32 + 1;
            Self {
                records: Arc::new(Mutex::new(records)),
                next_id: Arc::new(Mutex::new(next_id)),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self { fail_lookups: true, ..Default::default() }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn records(&self) -> Vec<ApiRecord> {
            self.records.lock().unwrap().clone()
        }

        fn record_call(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn apply(record: &mut ApiRecord, spec: &ApiSpec) {
            record.name = spec.name.clone();
            record.upstream_url = Some(spec.upstream_url.clone());
            if spec.hosts.is_some() {
                record.hosts = spec.hosts.clone();
            }
            if spec.uris.is_some() {
                record.uris = spec.uris.clone();
            }
            record.strip_uri = Some(spec.strip_uri);
            record.preserve_host = Some(spec.preserve_host);
        }
    }

    pub fn record(id: &str, name: &str, upstream_url: &str) -> ApiRecord {
        ApiRecord {
            id: id.to_string(),
            name: name.to_string(),
            upstream_url: Some(upstream_url.to_string()),
            hosts: None,
            uris: None,
            strip_uri: Some(false),
            preserve_host: Some(false),
            extra: Default::default(),
        }
    }

    #[async_trait]
    impl ApiLookup for FakeGateway {
        async fn list_apis(&self) -> Result<Vec<ApiSummary>> {
            self.record_call("list".to_string());
            if self.fail_lookups {
                return Err(Error::lookup_status("list", 500, "gateway unavailable"));
            }
            Ok(self
                .records()
                .into_iter()
                .map(|r| ApiSummary { id: r.id, name: Some(r.name), extra: Default::default() })
                .collect())
        }

        async fn get_api(&self, id: &str) -> Result<ApiRecord> {
            self.record_call(format!("get {}", id));
            self.records()
                .into_iter()
                .find(|r| r.id == id)
                .ok_or_else(|| Error::lookup_status("get", 404, "Not found"))
        }
    }

    #[async_trait]
    impl ApiExecutor for FakeGateway {
        async fn create_api(&self, spec: &ApiSpec) -> Result<ApiRecord> {
            self.record_call(format!("create {}", spec.name));
            let id = {
                let mut next_id = self.next_id.lock().unwrap();
                let id = next_id.to_string();
                *next_id += 1;
                id
            };
            let mut created = record(&id, &spec.name, &spec.upstream_url);
            Self::apply(&mut created, spec);
            self.records.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update_api(&self, id: &str, spec: &ApiSpec) -> Result<ApiRecord> {
            self.record_call(format!("update {}", id));
            let mut records = self.records.lock().unwrap();
            let existing = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| Error::execution_status("update", 404, "Not found"))?;
            Self::apply(existing, spec);
            Ok(existing.clone())
        }

        async fn delete_api(&self, id: &str) -> Result<()> {
            self.record_call(format!("delete {}", id));
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(Error::execution_status("delete", 404, "Not found"));
            }
            Ok(())
        }
    }
}
