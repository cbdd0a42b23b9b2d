//! Clinical Dashboard Terminal Front End
//!
//! A line-oriented front end over [`domain_tasks::DashboardService`]:
//!
//! - `config`: `DASHBOARD_*` environment configuration
//! - `commands`: prompt command parsing
//! - `render`: plain-text screens and notification lines
//! - `app`: command dispatch and backend selection

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

pub use app::{build_backend, DashboardApp, Flow};
pub use commands::Command;
pub use config::{DashboardConfig, DataSource};
pub use error::CommandError;
