//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::TaskId;
use domain_tasks::ports::ApiTask;
use domain_tasks::Task;

/// Builder for backend task entries
pub struct ApiTaskBuilder {
    task_type: String,
    title: String,
    prompt: Option<String>,
    description: Option<String>,
}

impl ApiTaskBuilder {
    /// Creates a builder for the given action type with an empty title
    pub fn new(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            title: String::new(),
            prompt: None,
            description: None,
        }
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the wire task
    pub fn build(self) -> ApiTask {
        ApiTask {
            task_type: self.task_type,
            title: self.title,
            prompt: self.prompt,
            description: self.description,
        }
    }

    /// Builds the store task at the given list position
    pub fn build_task(self, index: usize) -> Task {
        Task::from_api(index, self.build())
    }
}

/// Converts a wire task list into store tasks with positional ids
pub fn tasks_from_api(tasks: Vec<ApiTask>) -> Vec<Task> {
    tasks
        .into_iter()
        .enumerate()
        .map(|(index, api)| Task::from_api(index, api))
        .collect()
}

/// Positional id shorthand: `tid(1)` is `task-1`
pub fn tid(position: usize) -> TaskId {
    TaskId::positional(position.saturating_sub(1))
}
