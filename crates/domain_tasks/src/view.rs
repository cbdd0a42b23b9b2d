//! Derived projections for rendering
//!
//! Nothing here is stored. Every value is recomputed from the task store,
//! the generation cache, and the patient, so a view can never disagree with
//! the state it was built from.

use chrono::NaiveDate;
use serde::Serialize;

use core_kernel::{SessionId, TaskId};

use crate::content::RecommendationCard;
use crate::generation::GenerationCache;
use crate::patient::Patient;
use crate::store::TaskStore;
use crate::task::{Task, TaskCategory};

/// One row of the task list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskListRow {
    pub id: TaskId,
    pub title: String,
    pub category: TaskCategory,
    pub icon: &'static str,
    pub is_selected: bool,
    pub is_generating: bool,
    pub has_content: bool,
    pub is_approved: bool,
    pub is_edited: bool,
}

/// What the detail pane shows for the selected task
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailBody {
    NoSelection,
    /// Selected but no record and nothing in flight
    NotGenerated,
    Generating,
    /// Editable text preview
    Text {
        content_type: String,
        buffer: String,
        original: String,
        edited: bool,
    },
    /// Read-only recommendation cards
    Cards {
        content_type: String,
        cards: Vec<RecommendationCard>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPane {
    pub task: Option<Task>,
    pub body: DetailBody,
    pub is_approved: bool,
    /// Approval is only offered once content exists
    pub can_approve: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteBar {
    pub approved_count: usize,
    pub can_execute: bool,
    pub is_executing: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientHeader {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub age: u32,
    pub session_id: SessionId,
}

impl From<&Patient> for PatientHeader {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            date_of_birth: patient.date_of_birth,
            age: patient.age(),
            session_id: patient.session_id.clone(),
        }
    }
}

/// Everything a front end needs to draw the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub patient: Option<PatientHeader>,
    pub rows: Vec<TaskListRow>,
    pub detail: DetailPane,
    pub execute_bar: ExecuteBar,
    pub executed_count: usize,
}

impl DashboardView {
    /// Builds the complete view from current state
    pub fn build(
        store: &TaskStore,
        cache: &GenerationCache,
        patient: Option<&Patient>,
        executing: bool,
    ) -> Self {
        Self {
            patient: patient.map(PatientHeader::from),
            rows: task_rows(store, cache),
            detail: detail_pane(store, cache),
            execute_bar: execute_bar(cache, executing),
            executed_count: store.executed().len(),
        }
    }
}

/// Task list rows in store order
pub fn task_rows(store: &TaskStore, cache: &GenerationCache) -> Vec<TaskListRow> {
    let selected = store.selected_id();

    store
        .tasks()
        .iter()
        .map(|task| {
            let record = cache.get(&task.id);
            TaskListRow {
                id: task.id.clone(),
                title: task.title.clone(),
                category: task.category,
                icon: task.icon(),
                is_selected: selected == Some(&task.id),
                is_generating: cache.is_generating(&task.id),
                has_content: record.is_some(),
                is_approved: record.map(|r| r.is_approved()).unwrap_or(false),
                is_edited: record.map(|r| r.is_edited()).unwrap_or(false),
            }
        })
        .collect()
}

/// Detail pane for the selected task
pub fn detail_pane(store: &TaskStore, cache: &GenerationCache) -> DetailPane {
    let Some(task) = store.selected() else {
        return DetailPane {
            task: None,
            body: DetailBody::NoSelection,
            is_approved: false,
            can_approve: false,
        };
    };

    let record = cache.get(&task.id);
    let body = match record {
        None if cache.is_generating(&task.id) => DetailBody::Generating,
        None => DetailBody::NotGenerated,
        Some(record) => {
            let content = record.content();
            match content.content.cards() {
                Some(cards) => DetailBody::Cards {
                    content_type: content.content_type.clone(),
                    cards: cards.to_vec(),
                },
                None => {
                    let original = content.content.as_text().unwrap_or_default().to_string();
                    DetailBody::Text {
                        content_type: content.content_type.clone(),
                        buffer: record.edited_text().map(str::to_string).unwrap_or_else(|| original.clone()),
                        edited: record.is_edited(),
                        original,
                    }
                }
            }
        }
    };

    DetailPane {
        task: Some(task.clone()),
        body,
        is_approved: record.map(|r| r.is_approved()).unwrap_or(false),
        can_approve: record.is_some(),
    }
}

/// Execute control state
pub fn execute_bar(cache: &GenerationCache, executing: bool) -> ExecuteBar {
    let approved_count = cache.approved_count();
    let label = if executing {
        "Executing...".to_string()
    } else if approved_count == 0 {
        "No approved tasks".to_string()
    } else if approved_count == 1 {
        "Execute 1 approved task".to_string()
    } else {
        format!("Execute {} approved tasks", approved_count)
    };

    ExecuteBar {
        approved_count,
        can_execute: approved_count > 0 && !executing,
        is_executing: executing,
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::GeneratedContent;

    fn store() -> TaskStore {
        let mut store = TaskStore::new();
        store.replace(vec![
            Task::new(TaskId::positional(0), "Email labs", "send_email"),
            Task::new(TaskId::positional(1), "Cardiology referral", "write_referral_letter"),
        ]);
        store
    }

    #[test]
    fn test_rows_reflect_cache_state() {
        let store = store();
        let mut cache = GenerationCache::new();
        let first = TaskId::positional(0);
        cache.insert(first.clone(), "send_email", GeneratedContent::text("Email Draft", "Hi"));
        cache.toggle_approval(&first);
        cache.begin_generation(&TaskId::positional(1), 1);

        let rows = task_rows(&store, &cache);
        assert!(rows[0].is_selected);
        assert!(rows[0].is_approved);
        assert!(!rows[0].is_generating);
        assert!(rows[1].is_generating);
        assert!(!rows[1].has_content);
        assert_eq!(rows[1].icon, "user-plus");
    }

    #[test]
    fn test_detail_pane_states() {
        let mut store = store();
        let mut cache = GenerationCache::new();
        let first = TaskId::positional(0);

        assert_eq!(detail_pane(&store, &cache).body, DetailBody::NotGenerated);

        cache.begin_generation(&first, 1);
        assert_eq!(detail_pane(&store, &cache).body, DetailBody::Generating);

        cache.finish_generation(&first, 1);
        cache.insert(first.clone(), "send_email", GeneratedContent::text("Email Draft", "Hi"));
        cache.edit_content(&first, "Hello");
        match detail_pane(&store, &cache).body {
            DetailBody::Text { buffer, original, edited, .. } => {
                assert_eq!(buffer, "Hello");
                assert_eq!(original, "Hi");
                assert!(edited);
            }
            other => panic!("unexpected body: {:?}", other),
        }

        store.clear_selection();
        let pane = detail_pane(&store, &cache);
        assert_eq!(pane.body, DetailBody::NoSelection);
        assert!(!pane.can_approve);
    }

    #[test]
    fn test_execute_bar_labels() {
        let mut cache = GenerationCache::new();
        assert!(!execute_bar(&cache, false).can_execute);

        for index in 0..2 {
            let id = TaskId::positional(index);
            cache.insert(id.clone(), "send_email", GeneratedContent::text("Email Draft", "x"));
            cache.toggle_approval(&id);
        }

        let bar = execute_bar(&cache, false);
        assert_eq!(bar.approved_count, 2);
        assert_eq!(bar.label, "Execute 2 approved tasks");
        assert!(!execute_bar(&cache, true).can_execute);
    }
}
