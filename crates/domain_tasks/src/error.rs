//! Dashboard domain errors

use thiserror::Error;

use core_kernel::{PortError, TaskId};

/// Errors raised by dashboard operations
///
/// Every backend failure collapses into the kind of the operation that
/// failed; the port error is kept as the source for diagnostics.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Failed to load {resource}: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: PortError,
    },

    #[error("Failed to generate content for {task_id}: {source}")]
    Generation {
        task_id: TaskId,
        #[source]
        source: PortError,
    },

    #[error("Failed to execute {count} approved task(s): {source}")]
    Execution {
        count: usize,
        #[source]
        source: PortError,
    },

    #[error("No approved tasks to execute")]
    NoApprovedTasks,

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("A batch execution is already in progress")]
    ExecutionInProgress,
}

impl DashboardError {
    /// True when the user can re-trigger the operation
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DashboardError::Fetch { .. }
                | DashboardError::Generation { .. }
                | DashboardError::Execution { .. }
        )
    }

    /// The underlying port error, if the backend was involved
    pub fn port_error(&self) -> Option<&PortError> {
        match self {
            DashboardError::Fetch { source, .. }
            | DashboardError::Generation { source, .. }
            | DashboardError::Execution { source, .. } => Some(source),
            _ => None,
        }
    }
}
