//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! clinical dashboard test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built task, patient, and content data
//! - `builders`: Builder patterns for test data construction
//! - `backend`: A scriptable backend double with failure injection and gated generation
//! - `assertions`: Custom assertion helpers for dashboard state
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod backend;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use backend::*;
pub use assertions::*;
pub use generators::*;
