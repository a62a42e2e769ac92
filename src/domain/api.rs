//! API registration types
//!
//! `ApiSpec` is what the caller declares, `ApiRecord` is what the gateway
//! holds. The listing endpoint only returns `ApiSummary` entries, which is
//! why a full record has to be fetched separately before diffing.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::field::{FieldValue, ManagedField};
use crate::errors::{Error, Result};

/// Desired state of a single API registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ApiSpec {
    /// Unique key used to find the registration on the gateway
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    /// Upstream the gateway proxies to
    #[validate(url(message = "Upstream URL must be a valid URL"))]
    pub upstream_url: String,

    /// Host header values routed to this API
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "one_or_many")]
    pub hosts: Option<Vec<String>>,

    /// Request path prefixes routed to this API
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "one_or_many")]
    pub uris: Option<Vec<String>>,

    /// Strip the matched URI prefix before proxying
    #[serde(default)]
    pub strip_uri: bool,

    /// Forward the client's Host header upstream
    #[serde(default)]
    pub preserve_host: bool,
}

impl ApiSpec {
    /// Create a spec with only the required fields set
    pub fn new<N: Into<String>, U: Into<String>>(name: N, upstream_url: U) -> Self {
        Self {
            name: name.into(),
            upstream_url: upstream_url.into(),
            hosts: None,
            uris: None,
            strip_uri: false,
            preserve_host: false,
        }
    }

    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = Some(hosts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uris = Some(uris.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_strip_uri(mut self, strip_uri: bool) -> Self {
        self.strip_uri = strip_uri;
        self
    }

    pub fn with_preserve_host(mut self, preserve_host: bool) -> Self {
        self.preserve_host = preserve_host;
        self
    }

    /// Validate the spec before any remote call is made
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        for (field, values) in [("hosts", &self.hosts), ("uris", &self.uris)] {
            if let Some(values) = values {
                if values.is_empty() {
                    return Err(Error::validation_field(
                        format!("{} must contain at least one entry when set", field),
                        field,
                    ));
                }
                if values.iter().any(|v| v.trim().is_empty()) {
                    return Err(Error::validation_field(
                        format!("{} cannot contain empty entries", field),
                        field,
                    ));
                }
            }
        }

        Ok(())
    }

    /// Desired value of a managed field, `None` when the caller left it unset
    pub fn field(&self, field: ManagedField) -> Option<FieldValue<'_>> {
        match field {
            ManagedField::Name => Some(FieldValue::Text(&self.name)),
            ManagedField::UpstreamUrl => Some(FieldValue::Text(&self.upstream_url)),
            ManagedField::Hosts => self.hosts.as_deref().map(FieldValue::List),
            ManagedField::Uris => self.uris.as_deref().map(FieldValue::List),
            ManagedField::StripUri => Some(FieldValue::Flag(self.strip_uri)),
            ManagedField::PreserveHost => Some(FieldValue::Flag(self.preserve_host)),
        }
    }
}

/// A registration as the gateway reports it.
///
/// Managed attributes are optional because the gateway omits unset fields.
/// Server-only fields (timestamps, retry counts, ...) are kept in `extra` so
/// output payloads echo the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRecord {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "one_or_many")]
    pub hosts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "one_or_many")]
    pub uris: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_uri: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_host: Option<bool>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ApiRecord {
    /// Actual value of a managed field, `None` when the gateway omitted it
    pub fn field(&self, field: ManagedField) -> Option<FieldValue<'_>> {
        match field {
            ManagedField::Name => Some(FieldValue::Text(&self.name)),
            ManagedField::UpstreamUrl => self.upstream_url.as_deref().map(FieldValue::Text),
            ManagedField::Hosts => self.hosts.as_deref().map(FieldValue::List),
            ManagedField::Uris => self.uris.as_deref().map(FieldValue::List),
            ManagedField::StripUri => self.strip_uri.map(FieldValue::Flag),
            ManagedField::PreserveHost => self.preserve_host.map(FieldValue::Flag),
        }
    }

    /// The record as a JSON payload for caller-facing output
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(Error::from)
    }
}

/// Listing entry; the gateway may return only part of the record here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSummary {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `GET /apis`. Only the first page is ever read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiListing {
    #[serde(default)]
    pub data: Vec<ApiSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accept `"a.com"`, `["a.com", "b.com"]` or `null`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(many) => many,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_defaults_from_yaml() {
        let yaml = r#"
name: Mockbin
upstream_url: http://mockbin.com
hosts: mockbin.com
"#;
        let spec: ApiSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.name, "Mockbin");
        assert_eq!(spec.hosts, Some(vec!["mockbin.com".to_string()]));
        assert_eq!(spec.uris, None);
        assert!(!spec.strip_uri);
        assert!(!spec.preserve_host);
    }

    #[test]
    fn test_spec_serialization_omits_unset_lists() {
        let spec = ApiSpec::new("Mockbin", "http://mockbin.com");
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Mockbin",
                "upstream_url": "http://mockbin.com",
                "strip_uri": false,
                "preserve_host": false
            })
        );
    }

    #[test]
    fn test_spec_validation() {
        assert!(ApiSpec::new("Mockbin", "http://mockbin.com").validate().is_ok());

        let err = ApiSpec::new("", "http://mockbin.com").validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: Some(ref f), .. } if f == "name"));

        let err = ApiSpec::new("Mockbin", "not a url").validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: Some(ref f), .. } if f == "upstream_url"));

        let err = ApiSpec::new("Mockbin", "http://mockbin.com")
            .with_hosts(Vec::<String>::new())
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: Some(ref f), .. } if f == "hosts"));

        let err = ApiSpec::new("Mockbin", "http://mockbin.com")
            .with_uris(["/a", " "])
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: Some(ref f), .. } if f == "uris"));
    }

    #[test]
    fn test_record_keeps_server_fields() {
        let record: ApiRecord = serde_json::from_value(json!({
            "id": "1",
            "name": "Mockbin",
            "upstream_url": "http:\\/\\/mockbin.com",
            "hosts": ["mockbin.com"],
            "created_at": 1488830759000u64,
            "retries": 5
        }))
        .unwrap();

        assert_eq!(record.id, "1");
        assert_eq!(record.uris, None);
        assert_eq!(record.strip_uri, None);
        assert_eq!(record.extra.get("retries"), Some(&json!(5)));

        let echoed = record.to_json().unwrap();
        assert_eq!(echoed["created_at"], json!(1488830759000u64));
        assert!(echoed.get("uris").is_none());
    }

    #[test]
    fn test_record_accepts_null_lists() {
        let record: ApiRecord = serde_json::from_value(json!({
            "id": "1",
            "name": "Mockbin",
            "hosts": null
        }))
        .unwrap();
        assert_eq!(record.hosts, None);
        assert_eq!(record.field(ManagedField::Hosts), None);
    }

    #[test]
    fn test_field_accessors() {
        let spec = ApiSpec::new("Mockbin", "http://mockbin.com").with_strip_uri(true);
        assert_eq!(spec.field(ManagedField::Hosts), None);
        assert_eq!(spec.field(ManagedField::StripUri), Some(FieldValue::Flag(true)));
        assert_eq!(spec.field(ManagedField::Name), Some(FieldValue::Text("Mockbin")));
    }

    #[test]
    fn test_listing_without_data() {
        let listing: ApiListing = serde_json::from_str("{}").unwrap();
        assert!(listing.data.is_empty());

        let listing: ApiListing =
            serde_json::from_value(json!({"data": [{"id": "1", "name": "Mockbin"}], "total": 1}))
                .unwrap();
        assert_eq!(listing.data[0].name.as_deref(), Some("Mockbin"));
        assert_eq!(listing.total, Some(1));
    }
}
