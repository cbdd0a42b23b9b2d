//! Command dispatch
//!
//! Maps parsed commands onto [`DashboardService`] operations and renders
//! the result. Backend failures are already reported through the
//! notification queue, so they only produce a log line here.

use std::sync::Arc;

use core_kernel::{PortError, TaskId};
use domain_tasks::{
    ClinicalBackendPort, DashboardService, FixtureBackend, GenerateOutcome, NotificationQueue, SelectOutcome,
};
use infra_http::HttpBackendAdapter;

use crate::commands::Command;
use crate::config::{DashboardConfig, DataSource};
use crate::error::CommandError;
use crate::render;

/// Builds the backend adapter named by the configuration
pub fn build_backend(config: &DashboardConfig) -> Result<Arc<dyn ClinicalBackendPort>, PortError> {
    match config.data_source {
        DataSource::Fixture => Ok(Arc::new(FixtureBackend::new())),
        DataSource::Http => Ok(Arc::new(HttpBackendAdapter::new(config.http_config())?)),
    }
}

/// What the prompt loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// The terminal dashboard: a service plus the queue it reports into
#[derive(Clone)]
pub struct DashboardApp {
    service: DashboardService,
    notifications: Arc<NotificationQueue>,
}

impl DashboardApp {
    pub fn new(backend: Arc<dyn ClinicalBackendPort>, config: &DashboardConfig) -> Self {
        let notifications = Arc::new(NotificationQueue::new());
        let service = DashboardService::new(backend, notifications.clone(), config.selection_mode);
        Self { service, notifications }
    }

    pub fn service(&self) -> &DashboardService {
        &self.service
    }

    /// Loads tasks and patient and renders the first screen
    pub async fn start(&self) -> String {
        if let Err(error) = self.service.initialize().await {
            tracing::warn!(error = %error, "Dashboard started with errors");
        }
        self.screen().await
    }

    /// Pending notifications as display lines, oldest first
    pub fn drain_notifications(&self) -> Vec<String> {
        self.notifications
            .drain()
            .iter()
            .map(render::render_notification)
            .collect()
    }

    async fn screen(&self) -> String {
        render::render_view(&self.service.view().await)
    }

    async fn target(&self, task: Option<TaskId>) -> Result<TaskId, CommandError> {
        match task {
            Some(id) => Ok(id),
            None => self.service.selected_task_id().await.ok_or(CommandError::NoSelection),
        }
    }

    /// Parses and runs one input line
    pub async fn handle_line(&self, line: &str) -> Flow {
        match line.parse::<Command>() {
            Ok(command) => self.run(command).await,
            Err(CommandError::Empty) => Flow::Continue(String::new()),
            Err(error) => Flow::Continue(error.to_string()),
        }
    }

    /// Runs a command and returns the text to display
    pub async fn run(&self, command: Command) -> Flow {
        match self.execute(command).await {
            Ok(flow) => flow,
            Err(error) => Flow::Continue(error.to_string()),
        }
    }

    async fn execute(&self, command: Command) -> Result<Flow, CommandError> {
        tracing::debug!(?command, "Running command");

        let output = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => render::HELP.to_string(),
            Command::Show => self.screen().await,
            Command::Select(id) => match self.service.select_task(&id).await {
                Ok(SelectOutcome::Unknown) => format!("No task {}.", id),
                Ok(SelectOutcome::Selected { .. }) | Err(_) => self.screen().await,
            },
            Command::Generate(task) => {
                let id = self.target(task).await?;
                match self.service.generate(&id).await {
                    Ok(GenerateOutcome::AlreadyGenerated) => format!("{} already has a preview.", id),
                    Ok(GenerateOutcome::InFlight) => format!("{} is already generating.", id),
                    Ok(GenerateOutcome::Discarded) => "The task list changed; preview discarded.".to_string(),
                    Ok(GenerateOutcome::Generated) | Err(_) => self.screen().await,
                }
            }
            Command::Edit(text) => {
                let id = self.target(None).await?;
                if self.service.edit_content(&id, text).await {
                    self.screen().await
                } else {
                    format!("{} has no editable draft.", id)
                }
            }
            Command::Reset(task) => {
                let id = self.target(task).await?;
                if self.service.reset_edit(&id).await {
                    self.screen().await
                } else {
                    format!("{} has no editable draft.", id)
                }
            }
            Command::Approve(task) => {
                let id = self.target(task).await?;
                match self.service.toggle_approval(&id).await {
                    Some(_) => self.screen().await,
                    None => format!("{} has no preview to approve yet.", id),
                }
            }
            Command::Execute => match self.service.execute_approved().await {
                Ok(summary) => format!("Executed {} at {}.", summary.executed_count, summary.executed_at.to_rfc3339()),
                Err(error) => {
                    tracing::debug!(error = %error, "Execution did not complete");
                    String::new()
                }
            },
            Command::Reload => match self.service.refresh().await {
                Ok(_) => self.screen().await,
                Err(_) => String::new(),
            },
            Command::Patient => match self.service.patient().await {
                Some(patient) => render::render_patient(&(&patient).into()),
                None => "Patient not loaded.".to_string(),
            },
            Command::History => render::render_history(&self.service.executed_tasks().await),
        };

        Ok(Flow::Continue(output))
    }
}
