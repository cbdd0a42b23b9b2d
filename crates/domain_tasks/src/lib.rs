//! Clinical Task Domain
//!
//! This crate implements the task-lifecycle state behind the clinician
//! dashboard: AI-suggested clinical actions are fetched from the backend,
//! previewed, edited, approved, and executed in one batch.
//!
//! # Task Lifecycle
//!
//! ```text
//! Listed -> Generating -> Generated -> (Edited) -> Approved -> Executed
//!              |
//!              +-> failed: back to Listed, retry by user action
//! ```
//!
//! # Components
//!
//! - [`TaskStore`]: the fetched tasks and the selected task id
//! - [`GenerationCache`]: generated previews, edit buffers, and approvals
//! - [`DashboardService`]: the orchestrator driving the backend port
//! - [`view`]: purely derived list/detail projections for rendering

pub mod task;
pub mod content;
pub mod patient;
pub mod store;
pub mod generation;
pub mod ports;
pub mod adapters;
pub mod notifications;
pub mod service;
pub mod view;
pub mod error;

pub use task::{Task, TaskCategory};
pub use content::{ContentBody, GeneratedContent, RecommendationCard};
pub use patient::Patient;
pub use store::TaskStore;
pub use generation::{GenerationCache, GenerationRecord};
pub use ports::ClinicalBackendPort;
pub use adapters::FixtureBackend;
pub use notifications::{Notification, NotificationLevel, NotificationQueue, Notifier};
pub use service::{DashboardService, ExecutionSummary, GenerateOutcome, SelectOutcome, SelectionMode};
pub use error::DashboardError;
