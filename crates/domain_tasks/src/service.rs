//! Dashboard orchestrator
//!
//! [`DashboardService`] owns the task store and generation cache and drives
//! the backend port. It is cheap to clone; clones share state, so generation
//! for several tasks can run concurrently from different tokio tasks.
//!
//! The state lock is never held across a backend call. Each operation takes
//! a short write lock to read what it needs and mark work in flight, awaits
//! the backend, then takes the lock again to reconcile the result.
//!
//! # Stale responses
//!
//! Task ids are positional and only stable within one fetch cycle, so every
//! successful task load advances a load epoch. A generation response is
//! applied only if the epoch it was issued under is still current and the
//! task is still present with the same type; otherwise it is discarded. A
//! response for a task that is present but no longer selected is applied.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use core_kernel::TaskId;

use crate::error::DashboardError;
use crate::generation::{GenerationCache, GenerationRecord};
use crate::notifications::{Notification, Notifier};
use crate::patient::Patient;
use crate::ports::{ClinicalBackendPort, ExecuteBatchRequest, ExecuteItem, GenerateRequest};
use crate::store::TaskStore;
use crate::task::Task;
use crate::view::DashboardView;

/// Whether selecting a task generates its content automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Selecting a task without a record triggers generation
    #[default]
    Auto,
    /// Generation only happens on explicit request
    Manual,
}

/// Result of a generation request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// New content was stored
    Generated,
    /// A record already existed; no request was issued
    AlreadyGenerated,
    /// A request for this task is already outstanding; no request was issued
    InFlight,
    /// The response arrived after the task list changed and was dropped
    Discarded,
}

/// Result of selecting a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The id is not in the task list; nothing changed
    Unknown,
    /// The task is selected; `generation` is set when the selection rule ran
    Selected { generation: Option<GenerateOutcome> },
}

/// Summary of a successful batch execution
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Executed task ids in list order
    pub task_ids: Vec<TaskId>,
    pub executed_count: usize,
    pub executed_at: DateTime<Utc>,
    /// Backend success payload, passed through unchanged
    pub response: serde_json::Value,
}

#[derive(Debug, Default)]
struct DashboardState {
    store: TaskStore,
    cache: GenerationCache,
    patient: Option<Patient>,
    epoch: u64,
    executing: bool,
    last_executed_count: Option<usize>,
}

struct Inner {
    backend: Arc<dyn ClinicalBackendPort>,
    notifier: Arc<dyn Notifier>,
    mode: SelectionMode,
    state: RwLock<DashboardState>,
}

/// Orchestrates task loading, generation, approval, and batch execution
#[derive(Clone)]
pub struct DashboardService {
    inner: Arc<Inner>,
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "task" } else { "tasks" }
}

fn plural_verb(count: usize) -> &'static str {
    if count == 1 { "was" } else { "were" }
}

impl DashboardService {
    /// Creates a service over a backend adapter chosen by the caller
    pub fn new(
        backend: Arc<dyn ClinicalBackendPort>,
        notifier: Arc<dyn Notifier>,
        mode: SelectionMode,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                notifier,
                mode,
                state: RwLock::new(DashboardState::default()),
            }),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.inner.mode
    }

    fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }

    // ========================
    // Loading
    // ========================

    /// Loads tasks and patient concurrently, then applies the selection rule
    ///
    /// Each load failure is notified on its own. The task error is returned
    /// in preference to the patient error. A failed automatic generation
    /// does not fail the mount; it has already been notified.
    pub async fn initialize(&self) -> Result<(), DashboardError> {
        let (tasks, patient) = tokio::join!(self.load_tasks(), self.load_patient());

        if tasks.is_ok() {
            if let Some(Err(error)) = self.apply_selection_rule().await {
                tracing::warn!(error = %error, "Automatic generation after mount failed");
            }
        }

        tasks?;
        patient?;
        Ok(())
    }

    /// Reloads the task list and applies the selection rule
    pub async fn refresh(&self) -> Result<usize, DashboardError> {
        let count = self.load_tasks().await?;
        if let Some(Err(error)) = self.apply_selection_rule().await {
            tracing::warn!(error = %error, "Automatic generation after refresh failed");
        }
        Ok(count)
    }

    /// Fetches the task list and replaces the store on success
    ///
    /// Records whose task vanished or changed type are pruned, and every
    /// outstanding generation request becomes stale. On failure nothing
    /// changes.
    pub async fn load_tasks(&self) -> Result<usize, DashboardError> {
        tracing::info!("Loading tasks");

        let api_tasks = match self.inner.backend.list_tasks().await {
            Ok(tasks) => tasks,
            Err(source) => {
                tracing::error!(error = %source, "Failed to load tasks");
                self.notify(
                    Notification::error("Could not load tasks", "The task list could not be fetched.")
                        .retryable(),
                );
                return Err(DashboardError::Fetch { resource: "tasks", source });
            }
        };

        let tasks: Vec<Task> = api_tasks
            .into_iter()
            .enumerate()
            .map(|(index, api)| Task::from_api(index, api))
            .collect();
        let count = tasks.len();
        let types: HashMap<TaskId, String> = tasks
            .iter()
            .map(|t| (t.id.clone(), t.task_type.clone()))
            .collect();

        let mut state = self.inner.state.write().await;
        state.epoch += 1;
        state.cache.clear_in_flight();
        let pruned = state
            .cache
            .retain_tasks(|id, task_type| types.get(id).map(|t| t == task_type).unwrap_or(false));
        state.store.replace(tasks);

        tracing::info!(
            count,
            pruned = pruned.len(),
            epoch = state.epoch,
            selected = ?state.store.selected_id(),
            "Tasks loaded"
        );
        Ok(count)
    }

    /// Fetches the patient for the session
    pub async fn load_patient(&self) -> Result<Patient, DashboardError> {
        match self.inner.backend.fetch_patient().await {
            Ok(patient) => {
                tracing::info!(patient_id = %patient.id, session_id = %patient.session_id, "Patient loaded");
                self.inner.state.write().await.patient = Some(patient.clone());
                Ok(patient)
            }
            Err(source) => {
                tracing::error!(error = %source, "Failed to load patient");
                self.notify(
                    Notification::error("Could not load patient", "Patient details could not be fetched.")
                        .retryable(),
                );
                Err(DashboardError::Fetch { resource: "patient", source })
            }
        }
    }

    // ========================
    // Selection and generation
    // ========================

    /// Selects a task and, in auto mode, generates its content if needed
    pub async fn select_task(&self, id: &TaskId) -> Result<SelectOutcome, DashboardError> {
        let selected = self.inner.state.write().await.store.select(id);
        if !selected {
            tracing::debug!(task_id = %id, "Ignoring selection of unknown task");
            return Ok(SelectOutcome::Unknown);
        }

        let generation = self.apply_selection_rule().await.transpose()?;
        Ok(SelectOutcome::Selected { generation })
    }

    /// The reactive rule: a selected task with no record gets generated
    ///
    /// Returns `None` when the rule did not fire (manual mode, nothing
    /// selected, or a record already exists).
    async fn apply_selection_rule(&self) -> Option<Result<GenerateOutcome, DashboardError>> {
        if self.inner.mode != SelectionMode::Auto {
            return None;
        }

        let target = {
            let state = self.inner.state.read().await;
            let target = state
                .store
                .selected_id()
                .filter(|id| !state.cache.contains(id))
                .cloned();
            target
        }?;

        Some(self.generate(&target).await)
    }

    /// Requests generated content for one task
    ///
    /// No request is issued if a record exists or one is already in flight.
    /// A failure is notified once and leaves no record behind; a failure that
    /// arrives after the task list was reloaded under it is only logged.
    pub async fn generate(&self, id: &TaskId) -> Result<GenerateOutcome, DashboardError> {
        let (request, epoch, task_type, title) = {
            let mut state = self.inner.state.write().await;
            let task = match state.store.get(id) {
                Some(task) => task.clone(),
                None => return Err(DashboardError::TaskNotFound(id.clone())),
            };
            if state.cache.contains(id) {
                return Ok(GenerateOutcome::AlreadyGenerated);
            }
            let epoch = state.epoch;
            if !state.cache.begin_generation(id, epoch) {
                return Ok(GenerateOutcome::InFlight);
            }
            (GenerateRequest::for_task(&task), epoch, task.task_type, task.title)
        };

        tracing::info!(task_id = %id, task_type = %task_type, "Generating task content");
        let result = self.inner.backend.generate(request).await;

        let mut state = self.inner.state.write().await;
        state.cache.finish_generation(id, epoch);

        let current = state.epoch == epoch
            && state
                .store
                .get(id)
                .map(|t| t.task_type == task_type)
                .unwrap_or(false);

        match result {
            Ok(content) => {
                if !current {
                    tracing::debug!(task_id = %id, epoch, "Discarding stale generation response");
                    return Ok(GenerateOutcome::Discarded);
                }

                let content_type = content.content_type.clone();
                state.cache.insert(id.clone(), task_type, content);
                tracing::info!(task_id = %id, content_type = %content_type, "Task content generated");
                Ok(GenerateOutcome::Generated)
            }
            Err(source) => {
                drop(state);
                if !current {
                    tracing::warn!(task_id = %id, epoch, error = %source, "Stale generation request failed");
                    return Err(DashboardError::Generation { task_id: id.clone(), source });
                }
                tracing::error!(task_id = %id, error = %source, "Failed to generate task content");
                self.notify(
                    Notification::error(
                        "Generation failed",
                        format!("Could not generate content for \"{}\".", title),
                    )
                    .retryable(),
                );
                Err(DashboardError::Generation { task_id: id.clone(), source })
            }
        }
    }

    // ========================
    // Review
    // ========================

    /// Overwrites the edit buffer of a generated text preview
    ///
    /// Returns false (and logs) if there is nothing to edit.
    pub async fn edit_content(&self, id: &TaskId, text: impl Into<String>) -> bool {
        self.inner.state.write().await.cache.edit_content(id, text)
    }

    /// Restores the edit buffer to the generated text
    pub async fn reset_edit(&self, id: &TaskId) -> bool {
        self.inner.state.write().await.cache.reset_edit(id)
    }

    /// Flips approval; `None` if the task has no generated content
    pub async fn toggle_approval(&self, id: &TaskId) -> Option<bool> {
        let approved = self.inner.state.write().await.cache.toggle_approval(id);
        if let Some(approved) = approved {
            tracing::debug!(task_id = %id, approved, "Approval toggled");
        }
        approved
    }

    // ========================
    // Execution
    // ========================

    /// Executes every approved task in one backend call
    ///
    /// With nothing approved this raises `NoApprovedTasks` and touches no
    /// state. On success the executed tasks leave the store and their records
    /// are cleared; on failure nothing changes.
    pub async fn execute_approved(&self) -> Result<ExecutionSummary, DashboardError> {
        let (items, task_ids, epoch) = {
            let mut state = self.inner.state.write().await;
            if state.executing {
                return Err(DashboardError::ExecutionInProgress);
            }

            let approved = state.cache.approved_ids();
            if approved.is_empty() {
                drop(state);
                tracing::warn!("Execution requested with no approved tasks");
                self.notify(Notification::warning(
                    "Nothing to execute",
                    "Approve at least one generated task first.",
                ));
                return Err(DashboardError::NoApprovedTasks);
            }

            let mut ordered: Vec<TaskId> = state
                .store
                .tasks()
                .iter()
                .filter(|t| approved.contains(&t.id))
                .map(|t| t.id.clone())
                .collect();
            let mut orphans: Vec<TaskId> = approved
                .iter()
                .filter(|id| !state.store.contains(id))
                .cloned()
                .collect();
            orphans.sort();
            ordered.extend(orphans);

            let items: Vec<ExecuteItem> = ordered
                .iter()
                .filter_map(|id| state.cache.get(id))
                .map(|record: &GenerationRecord| ExecuteItem {
                    task_type: record.task_type().to_string(),
                    content: record.execution_content(),
                })
                .collect();

            state.executing = true;
            (items, ordered, state.epoch)
        };

        let count = task_ids.len();
        let executed_at = Utc::now();
        let request = ExecuteBatchRequest {
            tasks: items,
            executed_at: executed_at.to_rfc3339(),
        };

        tracing::info!(count, "Executing approved tasks");
        let result = self.inner.backend.execute_batch(request).await;

        let mut state = self.inner.state.write().await;
        state.executing = false;

        match result {
            Ok(response) => {
                let executed: HashSet<TaskId> = task_ids.iter().cloned().collect();
                if state.epoch == epoch {
                    state.store.mark_executed(&executed);
                } else {
                    tracing::warn!(count, "Task list reloaded during execution, leaving it untouched");
                }
                state.cache.clear(&executed);
                state.last_executed_count = Some(count);
                let patient_name = state.patient.as_ref().map(|p| p.name.clone());
                drop(state);

                if let Some(reported) = response.get("executedCount").and_then(|v| v.as_u64()) {
                    if reported as usize != count {
                        tracing::warn!(count, reported, "Backend reported a different executed count");
                    }
                }

                let message = match patient_name {
                    Some(name) => format!("{} {} executed for {}.", count, plural(count), name),
                    None => format!("{} {} executed.", count, plural(count)),
                };
                tracing::info!(count, "Approved tasks executed");
                self.notify(Notification::success("Tasks executed", message));

                Ok(ExecutionSummary {
                    task_ids,
                    executed_count: count,
                    executed_at,
                    response,
                })
            }
            Err(source) => {
                drop(state);
                tracing::error!(count, error = %source, "Failed to execute approved tasks");
                self.notify(
                    Notification::error(
                        "Execution failed",
                        format!("{} approved {} {} not executed.", count, plural(count), plural_verb(count)),
                    )
                    .retryable(),
                );
                Err(DashboardError::Execution { count, source })
            }
        }
    }

    // ========================
    // Read access
    // ========================

    /// Derived view of the current state
    pub async fn view(&self) -> DashboardView {
        let state = self.inner.state.read().await;
        DashboardView::build(&state.store, &state.cache, state.patient.as_ref(), state.executing)
    }

    /// Active tasks in list order
    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.state.read().await.store.tasks().to_vec()
    }

    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        self.inner.state.read().await.store.get(id).cloned()
    }

    pub async fn selected_task_id(&self) -> Option<TaskId> {
        self.inner.state.read().await.store.selected_id().cloned()
    }

    /// Snapshot of the record for a task
    pub async fn record(&self, id: &TaskId) -> Option<GenerationRecord> {
        self.inner.state.read().await.cache.get(id).cloned()
    }

    pub async fn record_count(&self) -> usize {
        self.inner.state.read().await.cache.len()
    }

    pub async fn is_generating(&self, id: &TaskId) -> bool {
        self.inner.state.read().await.cache.is_generating(id)
    }

    pub async fn approved_count(&self) -> usize {
        self.inner.state.read().await.cache.approved_count()
    }

    pub async fn patient(&self) -> Option<Patient> {
        self.inner.state.read().await.patient.clone()
    }

    /// Count from the most recent successful execution
    pub async fn last_executed_count(&self) -> Option<usize> {
        self.inner.state.read().await.last_executed_count
    }

    /// Tasks executed during this session
    pub async fn executed_tasks(&self) -> Vec<Task> {
        self.inner.state.read().await.store.executed().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixtureBackend;
    use crate::notifications::{NotificationLevel, NotificationQueue};

    fn service(mode: SelectionMode) -> (DashboardService, Arc<NotificationQueue>) {
        let queue = Arc::new(NotificationQueue::new());
        let service = DashboardService::new(Arc::new(FixtureBackend::new()), queue.clone(), mode);
        (service, queue)
    }

    #[tokio::test]
    async fn test_initialize_loads_and_auto_generates_first_task() {
        let (service, queue) = service(SelectionMode::Auto);
        service.initialize().await.unwrap();

        assert_eq!(service.tasks().await.len(), 5);
        assert!(service.patient().await.is_some());

        let first = TaskId::positional(0);
        assert_eq!(service.selected_task_id().await, Some(first.clone()));
        assert!(service.record(&first).await.is_some());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_manual_mode_does_not_generate_on_select() {
        let (service, _) = service(SelectionMode::Manual);
        service.initialize().await.unwrap();

        let second = TaskId::positional(1);
        let outcome = service.select_task(&second).await.unwrap();
        assert_eq!(outcome, SelectOutcome::Selected { generation: None });
        assert_eq!(service.record_count().await, 0);
    }

    #[tokio::test]
    async fn test_select_unknown_task_is_noop() {
        let (service, _) = service(SelectionMode::Auto);
        service.initialize().await.unwrap();

        let outcome = service.select_task(&TaskId::from("task-42")).await.unwrap();
        assert_eq!(outcome, SelectOutcome::Unknown);
        assert_eq!(service.selected_task_id().await, Some(TaskId::positional(0)));
    }

    #[tokio::test]
    async fn test_generate_twice_issues_one_record() {
        let (service, _) = service(SelectionMode::Manual);
        service.load_tasks().await.unwrap();

        let id = TaskId::positional(0);
        assert_eq!(service.generate(&id).await.unwrap(), GenerateOutcome::Generated);
        assert_eq!(service.generate(&id).await.unwrap(), GenerateOutcome::AlreadyGenerated);
        assert_eq!(service.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_generate_unknown_task() {
        let (service, _) = service(SelectionMode::Manual);
        service.load_tasks().await.unwrap();

        let result = service.generate(&TaskId::from("task-99")).await;
        assert!(matches!(result, Err(DashboardError::TaskNotFound(_))));
    }

    #[tokio::test]
    async fn test_execute_without_approvals() {
        let (service, queue) = service(SelectionMode::Auto);
        service.initialize().await.unwrap();

        let result = service.execute_approved().await;
        assert!(matches!(result, Err(DashboardError::NoApprovedTasks)));
        assert_eq!(service.tasks().await.len(), 5);

        let notes = queue.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
    }

    #[tokio::test]
    async fn test_execute_single_approved_task() {
        let (service, queue) = service(SelectionMode::Auto);
        service.initialize().await.unwrap();

        let id = TaskId::positional(0);
        service.edit_content(&id, "Edited email").await;
        service.toggle_approval(&id).await;

        let summary = service.execute_approved().await.unwrap();
        assert_eq!(summary.executed_count, 1);
        assert_eq!(summary.task_ids, vec![id.clone()]);
        assert!(service.task(&id).await.is_none());
        assert!(service.record(&id).await.is_none());
        assert_eq!(service.executed_tasks().await.len(), 1);
        assert_eq!(service.last_executed_count().await, Some(1));

        let notes = queue.drain();
        assert_eq!(notes[0].level, NotificationLevel::Success);
        assert_eq!(notes[0].message, "1 task executed for John Doe.");
    }
}
