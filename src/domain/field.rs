//! Managed fields of an API registration

use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Every attribute reconciliation compares, in the order it compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedField {
    Name,
    UpstreamUrl,
    Hosts,
    Uris,
    StripUri,
    PreserveHost,
}

impl ManagedField {
    /// Declared comparison order
    pub const ALL: [ManagedField; 6] = [
        ManagedField::Name,
        ManagedField::UpstreamUrl,
        ManagedField::Hosts,
        ManagedField::Uris,
        ManagedField::StripUri,
        ManagedField::PreserveHost,
    ];

    /// Field name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagedField::Name => "name",
            ManagedField::UpstreamUrl => "upstream_url",
            ManagedField::Hosts => "hosts",
            ManagedField::Uris => "uris",
            ManagedField::StripUri => "strip_uri",
            ManagedField::PreserveHost => "preserve_host",
        }
    }
}

impl fmt::Display for ManagedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManagedField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManagedField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::unknown_field(s))
    }
}

/// A borrowed field value, desired or actual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Flag(bool),
}
