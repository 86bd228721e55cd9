//! Error types and handling for Sigenbridge
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Sigenbridge operations
pub type Result<T> = std::result::Result<T, SigenError>;

/// Main error type for Sigenbridge
#[derive(Debug, Error)]
pub enum SigenError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Modbus protocol errors not covered by a more specific variant
    #[error("Modbus error: {message}")]
    Modbus { message: String },

    /// Transport could not be established or was lost
    #[error("Connection failed to {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// Register payload could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Value could not be encoded for the wire
    #[error("Encode error: {message}")]
    Encode { message: String },

    /// Write refused before any I/O took place
    #[error("Write rejected: {message}")]
    WriteRejected { message: String },

    /// Global read-only mode is active
    #[error("Write rejected: read-only mode is enabled")]
    ReadOnlyMode,

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },
}

impl SigenError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        SigenError::Config {
            message: message.into(),
        }
    }

    /// Create a new Modbus error
    pub fn modbus<S: Into<String>>(message: S) -> Self {
        SigenError::Modbus {
            message: message.into(),
        }
    }

    /// Create a new connection error for an endpoint
    pub fn connection<S: Into<String>>(host: S, port: u16, message: S) -> Self {
        SigenError::ConnectionFailed {
            host: host.into(),
            port,
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        SigenError::Decode {
            message: message.into(),
        }
    }

    /// Create a new encode error
    pub fn encode<S: Into<String>>(message: S) -> Self {
        SigenError::Encode {
            message: message.into(),
        }
    }

    /// Create a new write rejection error
    pub fn write_rejected<S: Into<String>>(message: S) -> Self {
        SigenError::WriteRejected {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        SigenError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        SigenError::Io {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        SigenError::Timeout {
            message: message.into(),
        }
    }

    /// Whether this error means the transport itself is gone and the
    /// endpoint should reconnect before the next operation
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, SigenError::ConnectionFailed { .. })
    }
}

impl From<std::io::Error> for SigenError {
    fn from(err: std::io::Error) -> Self {
        SigenError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for SigenError {
    fn from(err: serde_yaml::Error) -> Self {
        SigenError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SigenError {
    fn from(err: serde_json::Error) -> Self {
        SigenError::Serialization {
            message: err.to_string(),
        }
    }
}
