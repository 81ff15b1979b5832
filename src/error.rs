//! Error types for the maintenance tool
//!
//! Not-found conditions are ordinary variants here; the dispatcher decides
//! how they map to exit codes.

use serde_json::Value;
use thiserror::Error;

/// Main error type for the maintenance tool
#[derive(Error, Debug)]
pub enum MaintenanceError {
    /// The host group lookup returned no matches
    #[error("group {name} not found!")]
    GroupNotFound { name: String },

    /// The group has no maintenance windows
    #[error("no maintenances for group {group_id} found!")]
    NoMaintenances { group_id: String },

    /// The server answered with a JSON-RPC error object
    #[error("API error in {method}: {message} ({code})")]
    Api {
        method: String,
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// HTTP or connection level failure
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered, but not with what the method promises
    #[error("Invalid response from {method}: {message}")]
    InvalidResponse { method: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl MaintenanceError {
    /// Create a new group-not-found error
    pub fn group_not_found(name: impl Into<String>) -> Self {
        Self::GroupNotFound { name: name.into() }
    }

    /// Create a new no-maintenances error
    pub fn no_maintenances(group_id: impl ToString) -> Self {
        Self::NoMaintenances {
            group_id: group_id.to_string(),
        }
    }

    /// Create a new API error from a JSON-RPC error object
    pub fn api(
        method: impl Into<String>,
        code: i64,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self::Api {
            method: method.into(),
            code,
            message: message.into(),
            data,
        }
    }

    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new transport error wrapping its cause
    pub fn transport_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error reports a missing group or missing maintenances
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GroupNotFound { .. } | Self::NoMaintenances { .. }
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MaintenanceError>;
