//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the ports and adapters
//! split between the dashboard core and the clinical backend.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Dashboard Orchestrator                     │
//! │        (task store, generation cache, batch execution)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ClinicalBackendPort trait                    │
//! │   listTasks / fetchPatient / generate / executeBatch         │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  Fixture Adapter  │     │  HTTP Adapter    │
//!         │   (in-memory)     │     │  (REST backend)  │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! The port trait itself lives in `domain_tasks`; this module holds the
//! error type every adapter reports and the configuration an external
//! adapter is built from.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::CorrelationId;

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// ensuring consistent error handling across the fixture and HTTP adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested resource was not found
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
    },

    /// The backend rejected the request payload
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// The operation conflicts with backend state
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the backend failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// The backend is unavailable or returned a server error
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The response could not be decoded into the expected shape
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(resource: impl fmt::Display) -> Self {
        PortError::NotFound {
            resource: resource.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed
    /// when the user triggers the operation again
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the resource was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// External system configuration for API-based adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSystemConfig {
    /// Base URL for the external system (e.g. "http://localhost:8000")
    pub base_url: String,
    /// Optional per-request timeout; `None` leaves timing to the transport
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Custom headers to include in requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ExternalSystemConfig {
    /// Creates a configuration for the given base URL with no timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_ms: None,
            headers: HashMap::new(),
        }
    }

    /// Sets the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Adds a static header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the configured timeout as a `Duration`
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Joins `path` onto the base URL, tolerating slashes on either side
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Metadata about a port operation for tracing
#[derive(Debug, Clone)]
pub struct OperationMetadata {
    /// Name of the port operation (e.g. "list_tasks")
    pub operation: &'static str,
    /// Correlation ID for tracing across systems
    pub correlation_id: CorrelationId,
    /// Additional context as key-value pairs
    pub context: HashMap<String, String>,
}

impl OperationMetadata {
    /// Creates metadata for an operation with a fresh correlation ID
    pub fn for_operation(operation: &'static str) -> Self {
        Self {
            operation,
            correlation_id: CorrelationId::new(),
            context: HashMap::new(),
        }
    }

    /// Adds context to the metadata
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}
