//! # Error Types
//!
//! Every failure a reconciliation can surface. Nothing here is retried: an
//! error aborts the invocation and the outer automation is expected to re-run.

/// Custom result type for kongsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gateway reconciliation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A read against the gateway (listing or detail) failed
    #[error("Lookup failed during {operation}: {message}")]
    Lookup {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// Delete requested for a name the gateway does not know
    #[error("API not found: no registration named '{name}'")]
    NotFound { name: String },

    /// A field name with no comparison rule
    #[error("Unknown field kind: '{field}' has no comparison rule")]
    UnknownFieldKind { field: String },

    /// A create/update/delete call against the gateway failed
    #[error("Execution failed during {operation}{}: {body}", status_suffix(.status))]
    Execution {
        operation: String,
        status: Option<u16>,
        body: String,
    },

    /// Desired state rejected before any remote call
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status: {})", s)).unwrap_or_default()
}

impl Error {
    /// Create a lookup error without an HTTP status (transport or decode failure)
    pub fn lookup<O: Into<String>, M: Into<String>>(operation: O, message: M) -> Self {
        Self::Lookup {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a lookup error for a non-2xx gateway response
    pub fn lookup_status<O: Into<String>, M: Into<String>>(
        operation: O,
        status: u16,
        message: M,
    ) -> Self {
        Self::Lookup {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an unknown field kind error
    pub fn unknown_field<S: Into<String>>(field: S) -> Self {
        Self::UnknownFieldKind { field: field.into() }
    }

    /// Create an execution error without an HTTP status
    pub fn execution<O: Into<String>, B: Into<String>>(operation: O, body: B) -> Self {
        Self::Execution {
            operation: operation.into(),
            status: None,
            body: body.into(),
        }
    }

    /// Create an execution error carrying the gateway's status and body
    pub fn execution_status<O: Into<String>, B: Into<String>>(
        operation: O,
        status: u16,
        body: B,
    ) -> Self {
        Self::Execution {
            operation: operation.into(),
            status: Some(status),
            body: body.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status returned by the gateway, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Lookup { status, .. } | Error::Execution { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            source: error,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            source: error,
            context: "JSON serialization failed".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let message = fields
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        match fields.as_slice() {
            [(field, _)] => Self::validation_field(format!("Validation failed: {}", message), field.to_string()),
            _ => Self::validation(format!("Validation failed: {}", message)),
        }
    }
}
