//! Clinical Backend Port
//!
//! This module defines the port interface between the dashboard and the
//! clinical backend, enabling swappable implementations chosen at
//! construction time:
//!
//! - **Fixture Adapter**: in-memory demo data ([`crate::adapters::FixtureBackend`])
//! - **HTTP Adapter**: the REST backend (`infra_http::HttpBackendAdapter`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_tasks::{ClinicalBackendPort, DashboardService, FixtureBackend};
//! use std::sync::Arc;
//!
//! let backend: Arc<dyn ClinicalBackendPort> = match config.data_source {
//!     DataSource::Fixture => Arc::new(FixtureBackend::new()),
//!     DataSource::Http => Arc::new(HttpBackendAdapter::new(http_config)?),
//! };
//! let service = DashboardService::new(backend, notifier, SelectionMode::Auto);
//! ```
//!
//! The wire types below mirror the backend's JSON contract exactly
//! (camelCase field names, `type` for the action type).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, PortError};
use crate::content::{ContentBody, GeneratedContent};
use crate::patient::Patient;
use crate::task::Task;

/// A task as returned by `GET /api/tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTask {
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The task as sent back to the backend for generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Task> for TaskDetails {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            task_type: task.task_type.clone(),
            prompt: task.prompt.clone(),
            description: task.description.clone(),
        }
    }
}

/// Body of `POST /api/tasks/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub task_type: String,
    pub task_details: TaskDetails,
}

impl GenerateRequest {
    /// Builds the generation request for a task
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_type: task.task_type.clone(),
            task_details: TaskDetails::from(task),
        }
    }
}

/// One approved task in an execution batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteItem {
    pub task_type: String,
    pub content: ContentBody,
}

/// Body of `POST /api/tasks/execute-batch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteBatchRequest {
    pub tasks: Vec<ExecuteItem>,
    /// RFC 3339 timestamp taken on the client when the batch was submitted
    pub executed_at: String,
}

/// Port for the clinical backend
///
/// Every failure, whether transport-level or a non-success status, is
/// reported as a [`PortError`]. Implementations must not retry.
#[async_trait]
pub trait ClinicalBackendPort: DomainPort {
    /// Lists the suggested tasks for the current session
    async fn list_tasks(&self) -> Result<Vec<ApiTask>, PortError>;

    /// Fetches the patient for the current session
    async fn fetch_patient(&self) -> Result<Patient, PortError>;

    /// Generates preview content for one task
    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedContent, PortError>;

    /// Executes a batch of approved tasks
    ///
    /// The success payload is backend-defined and returned as raw JSON.
    async fn execute_batch(&self, request: ExecuteBatchRequest) -> Result<serde_json::Value, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::TaskId;
    use serde_json::json;

    #[test]
    fn test_api_task_decodes_list_entry() {
        let json = r#"[{"type": "send_email", "title": "Email labs", "prompt": "Send the results"}]"#;
        let tasks: Vec<ApiTask> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].task_type, "send_email");
        assert_eq!(tasks[0].prompt.as_deref(), Some("Send the results"));
        assert_eq!(tasks[0].description, None);
    }

    #[test]
    fn test_generate_request_wire_shape() {
        let task = Task::new(TaskId::positional(0), "Email labs", "send_email").with_prompt("Send it");
        let value = serde_json::to_value(GenerateRequest::for_task(&task)).unwrap();

        assert_eq!(
            value,
            json!({
                "taskType": "send_email",
                "taskDetails": {
                    "id": "task-1",
                    "title": "Email labs",
                    "type": "send_email",
                    "prompt": "Send it"
                }
            })
        );
    }

    #[test]
    fn test_execute_batch_wire_shape() {
        let request = ExecuteBatchRequest {
            tasks: vec![ExecuteItem {
                task_type: "send_email".to_string(),
                content: ContentBody::Text("Hello".to_string()),
            }],
            executed_at: "2024-05-01T10:00:00+00:00".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tasks"][0]["taskType"], "send_email");
        assert_eq!(value["tasks"][0]["content"], "Hello");
        assert_eq!(value["executedAt"], "2024-05-01T10:00:00+00:00");
    }
}
