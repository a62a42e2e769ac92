//! Field comparator
//!
//! The gateway echoes strings back in escaped form (`http:\/\/host`), so
//! equality is field-specific rather than a plain `==` on the wire values.

use std::collections::BTreeSet;

use crate::domain::{ApiRecord, ApiSpec, FieldValue, ManagedField};
use crate::errors::Result;

/// Decide whether a desired value already matches the actual one.
///
/// - `upstream_url`: equal once backslashes are stripped from both sides
/// - `hosts`, `uris`: the backslash-stripped values, taken as sets, are equal
/// - `name`, `strip_uri`, `preserve_host`: plain equality
///
/// Values of the wrong kind for a field never match.
pub fn equivalent(field: ManagedField, desired: FieldValue<'_>, actual: FieldValue<'_>) -> bool {
    match field {
        ManagedField::UpstreamUrl => match (desired, actual) {
            (FieldValue::Text(desired), FieldValue::Text(actual)) => {
                unescape(desired) == unescape(actual)
            }
            _ => false,
        },
        ManagedField::Hosts | ManagedField::Uris => {
            match (unescaped_set(desired), unescaped_set(actual)) {
                (Some(desired), Some(actual)) => desired == actual,
                _ => false,
            }
        }
        ManagedField::Name | ManagedField::StripUri | ManagedField::PreserveHost => {
            desired == actual
        }
    }
}

/// [`equivalent`] keyed by wire name; unregistered names fail with
/// `UnknownFieldKind` instead of being skipped.
pub fn equivalent_by_name(
    field: &str,
    desired: FieldValue<'_>,
    actual: FieldValue<'_>,
) -> Result<bool> {
    Ok(equivalent(field.parse()?, desired, actual))
}

/// First managed field, in declared order, whose desired value is set and
/// does not match the gateway record. A field the gateway omitted counts as
/// a mismatch.
pub fn first_mismatch(desired: &ApiSpec, actual: &ApiRecord) -> Option<ManagedField> {
    ManagedField::ALL.into_iter().find(|&field| {
        let Some(wanted) = desired.field(field) else {
            return false;
        };
        match actual.field(field) {
            Some(current) => !equivalent(field, wanted, current),
            None => true,
        }
    })
}

fn unescape(value: &str) -> String {
    value.replace('\\', "")
}

fn unescaped_set(value: FieldValue<'_>) -> Option<BTreeSet<String>> {
    match value {
        FieldValue::Text(single) => Some(BTreeSet::from([unescape(single)])),
        FieldValue::List(many) => Some(many.iter().map(|v| unescape(v)).collect()),
        FieldValue::Flag(_) => None,
    }
}
