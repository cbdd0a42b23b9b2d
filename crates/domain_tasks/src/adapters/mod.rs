//! Backend Adapters
//!
//! Implementations of [`crate::ports::ClinicalBackendPort`] that live in the
//! domain crate. The HTTP adapter lives in `infra_http`.
//!
//! # Available Adapters
//!
//! - **FixtureBackend**: in-memory demo backend for offline use and tests

pub mod fixture;

pub use fixture::{FixtureBackend, find_nearby_specialists};
