//! Provisioning error types.
//!
//! This module defines the unified error type for all provisioning operations,
//! covering local configuration and validation failures, transport failures,
//! and rejections returned by the remote search service.

use thiserror::Error;

use crate::types::ResourceKind;

/// Unified errors from provisioning operations.
///
/// Used by the `SearchServiceProvider` trait and `ProvisioningService`. Remote
/// rejections always carry the HTTP status and the response body, since the
/// service's error message is the actionable part for an operator.
#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    /// Missing or unusable configuration value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network, DNS, TLS or timeout failure before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("{kind} '{name}' rejected with HTTP {status}: {body}")]
    RemoteRejection {
        kind: ResourceKind,
        name: String,
        status: u16,
        body: String,
    },

    /// A resource with the same name already exists.
    #[error("{kind} '{name}' already exists: {body}")]
    Conflict {
        kind: ResourceKind,
        name: String,
        body: String,
    },

    /// A payload breaks a local invariant (e.g. no key field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failed to serialize a payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failed to parse a response from the service.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The indexer finished its run in a failed state.
    #[error("Indexer '{indexer}' run ended with status {status}: {message}")]
    IndexerRunFailed {
        indexer: String,
        status: String,
        message: String,
    },

    /// The indexer did not reach a terminal state in time.
    #[error("Indexer '{indexer}' did not finish within {waited_secs}s")]
    MonitorTimeout { indexer: String, waited_secs: u64 },
}

impl ProvisioningError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Map a non-success response to an error. HTTP 409 becomes `Conflict`.
    pub fn from_response(
        kind: ResourceKind,
        name: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        if status == 409 {
            Self::Conflict {
                kind,
                name: name.into(),
                body: body.into(),
            }
        } else {
            Self::RemoteRejection {
                kind,
                name: name.into(),
                status,
                body: body.into(),
            }
        }
    }

    /// HTTP status of a remote rejection, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejection { status, .. } => Some(*status),
            Self::Conflict { .. } => Some(409),
            _ => None,
        }
    }

    /// Whether the service refused the request (as opposed to a local or transport failure).
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, Self::RemoteRejection { .. } | Self::Conflict { .. })
    }
}

impl From<reqwest::Error> for ProvisioningError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {}", err))
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProvisioningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
