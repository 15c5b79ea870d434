//! Error types for the OCI command-line client.
//!
//! Every failure surfaces to the top level and terminates the current
//! command. The taxonomy separates resolution failures, bad user input,
//! remote API failures and local configuration problems.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the OCI client.
#[derive(Debug, Error)]
pub enum OciCliError {
    /// A name could not be resolved to an identifier.
    #[error("{kind} '{name}' not found in {scope}")]
    NotFound {
        /// Kind of resource that was searched for.
        kind: ResourceKind,
        /// The name that was looked up.
        name: String,
        /// Human-readable description of the searched scope.
        scope: String,
    },

    /// User supplied conflicting or missing input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote API call failed.
    #[error("OCI API error: {0}")]
    Remote(#[from] RemoteError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Kind of cloud resource, used for literal identifier detection and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// An identity compartment (or the tenancy root).
    Compartment,
    /// A compute image.
    Image,
    /// A compute shape.
    Shape,
    /// A compute instance.
    Instance,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Compartment => "compartment",
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Instance => "instance",
        };
        f.write_str(name)
    }
}

/// Remote API failures.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status.
    #[error("{status} {code}: {message} (opc-request-id: {request_id})")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Service error code (e.g. `NotAuthorizedOrNotFound`).
        code: String,
        /// Error message from the service.
        message: String,
        /// Request identifier echoed by the service.
        request_id: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// The request could not be signed.
    #[error("request signing failed: {message}")]
    Signing {
        /// Description of the signing failure.
        message: String,
    },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    ParseError {
        /// Path of the file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// The requested profile does not exist.
    #[error("Profile '{profile}' not found in {path}")]
    ProfileNotFound {
        /// Requested profile name.
        profile: String,
        /// Path of the config file.
        path: PathBuf,
    },

    /// A required key is absent from the profile.
    #[error("Profile '{profile}' is missing required key '{key}'")]
    MissingKey {
        /// Profile name.
        profile: String,
        /// Missing key.
        key: String,
    },

    /// The private key file cannot be used.
    #[error("Invalid private key {path}: {message}")]
    InvalidKeyFile {
        /// Path to the key file.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for OCI client operations.
pub type Result<T> = std::result::Result<T, OciCliError>;

impl OciCliError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a not-found error for a named resource.
    #[must_use]
    pub fn not_found(kind: ResourceKind, name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Returns true if this is a name resolution failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl RemoteError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a signing error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Returns the HTTP status of a service error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}
