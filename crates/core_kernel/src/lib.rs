//! Core Kernel - Foundational types for the clinical task dashboard
//!
//! This crate provides the building blocks shared by every other crate:
//! - Strongly-typed identifiers for tasks, patients, and sessions
//! - The port error type and marker traits for backend adapters
//! - Common error types

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{TaskId, PatientId, SessionId, CorrelationId};
pub use ports::{PortError, DomainPort, ExternalSystemConfig, OperationMetadata};
pub use error::CoreError;
