//! Clinical tasks and their display categories

use serde::{Deserialize, Serialize};

use core_kernel::TaskId;
use crate::ports::ApiTask;

/// A suggested clinical action awaiting review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Positional client-side identifier (`task-1`, `task-2`, ...)
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// Raw action type from the backend, e.g. "write_referral_letter"
    #[serde(rename = "type")]
    pub task_type: String,
    /// Display category derived from `task_type`
    pub category: TaskCategory,
    /// Prompt the backend uses to generate content
    pub prompt: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Set once the task has been executed
    pub completed: bool,
}

impl Task {
    /// Creates a task with the category derived from its type
    pub fn new(id: TaskId, title: impl Into<String>, task_type: impl Into<String>) -> Self {
        let task_type = task_type.into();
        Self {
            id,
            title: title.into(),
            category: TaskCategory::from_task_type(&task_type),
            task_type,
            prompt: None,
            description: None,
            completed: false,
        }
    }

    /// Builds the task at `index` of a list response
    ///
    /// Empty titles fall back to the humanised type and empty prompts are
    /// treated as absent.
    pub fn from_api(index: usize, api: ApiTask) -> Self {
        let title = if api.title.trim().is_empty() {
            human_title(&api.task_type)
        } else {
            api.title
        };
        let mut task = Task::new(TaskId::positional(index), title, api.task_type);
        task.prompt = api.prompt.filter(|p| !p.trim().is_empty());
        task.description = api.description.filter(|d| !d.trim().is_empty());
        task
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

    /// Icon name for the list view
    pub fn icon(&self) -> &'static str {
        self.category.icon()
    }
}

/// Turns "write_referral_letter" into "Write Referral Letter"
pub fn human_title(task_type: &str) -> String {
    task_type
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Display category of a task
///
/// The backend sends free-form type strings. The mapping below is total:
/// every string lands in exactly one category, unknown ones in `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Documentation,
    Send,
    Referral,
    Order,
    Store,
    Booking,
    Finance,
    Reminder,
    General,
}

/// Keyword prefixes checked against each word of a task type, in order.
/// The first matching row wins, so "send_to_lab" is an order and
/// "write_referral_letter" a referral.
const KEYWORD_TABLE: &[(TaskCategory, &[&str])] = &[
    (TaskCategory::Referral, &["referral", "refer"]),
    (TaskCategory::Order, &["order", "lab", "test", "prescription", "prescribe", "equipment"]),
    (TaskCategory::Booking, &["book", "appointment", "schedule"]),
    (TaskCategory::Send, &["send", "email", "mail", "message", "notify"]),
    (TaskCategory::Documentation, &["document", "note", "letter", "print", "pamphlet", "summary", "draft"]),
    (TaskCategory::Store, &["store", "storage", "save", "upload", "record", "file"]),
    (TaskCategory::Finance, &["finance", "invoice", "bill", "payment", "claim"]),
    (TaskCategory::Reminder, &["remind", "follow"]),
];

impl TaskCategory {
    /// All categories, in display order
    pub const ALL: [TaskCategory; 9] = [
        TaskCategory::Documentation,
        TaskCategory::Send,
        TaskCategory::Referral,
        TaskCategory::Order,
        TaskCategory::Store,
        TaskCategory::Booking,
        TaskCategory::Finance,
        TaskCategory::Reminder,
        TaskCategory::General,
    ];

    /// Maps a raw backend type string to a category
    pub fn from_task_type(task_type: &str) -> Self {
        let normalized = task_type.trim().to_lowercase();

        if let Some(exact) = Self::from_vocabulary(&normalized) {
            return exact;
        }

        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        KEYWORD_TABLE
            .iter()
            .find(|(_, keywords)| {
                words
                    .iter()
                    .any(|word| keywords.iter().any(|k| word.starts_with(k)))
            })
            .map(|(category, _)| *category)
            .unwrap_or(TaskCategory::General)
    }

    fn from_vocabulary(value: &str) -> Option<Self> {
        match value {
            "documentation" => Some(TaskCategory::Documentation),
            "send" => Some(TaskCategory::Send),
            "referral" => Some(TaskCategory::Referral),
            "order" => Some(TaskCategory::Order),
            "store" => Some(TaskCategory::Store),
            "booking" => Some(TaskCategory::Booking),
            "finance" => Some(TaskCategory::Finance),
            "reminder" => Some(TaskCategory::Reminder),
            _ => None,
        }
    }

    /// Icon name used by the list view
    pub fn icon(&self) -> &'static str {
        match self {
            TaskCategory::Documentation => "file-text",
            TaskCategory::Send => "mail",
            TaskCategory::Referral => "user-plus",
            TaskCategory::Order => "package",
            TaskCategory::Store => "database",
            TaskCategory::Booking => "calendar",
            TaskCategory::Finance => "credit-card",
            TaskCategory::Reminder => "bell",
            TaskCategory::General => "clipboard-list",
        }
    }

    /// Human label
    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Documentation => "Documentation",
            TaskCategory::Send => "Send",
            TaskCategory::Referral => "Referral",
            TaskCategory::Order => "Order",
            TaskCategory::Store => "Store",
            TaskCategory::Booking => "Booking",
            TaskCategory::Finance => "Finance",
            TaskCategory::Reminder => "Reminder",
            TaskCategory::General => "General",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_matches_exactly() {
        assert_eq!(TaskCategory::from_task_type("booking"), TaskCategory::Booking);
        assert_eq!(TaskCategory::from_task_type("Finance"), TaskCategory::Finance);
    }

    #[test]
    fn test_backend_action_types() {
        assert_eq!(TaskCategory::from_task_type("send_email"), TaskCategory::Send);
        assert_eq!(TaskCategory::from_task_type("write_referral_letter"), TaskCategory::Referral);
        assert_eq!(TaskCategory::from_task_type("send_to_lab"), TaskCategory::Order);
        assert_eq!(TaskCategory::from_task_type("create_prescription"), TaskCategory::Order);
        assert_eq!(TaskCategory::from_task_type("book_appointment"), TaskCategory::Booking);
        assert_eq!(TaskCategory::from_task_type("print_document"), TaskCategory::Documentation);
        assert_eq!(TaskCategory::from_task_type("order_test"), TaskCategory::Order);
    }

    #[test]
    fn test_unknown_type_defaults_to_general() {
        assert_eq!(TaskCategory::from_task_type("teleport_patient"), TaskCategory::General);
        assert_eq!(TaskCategory::from_task_type(""), TaskCategory::General);
    }

    #[test]
    fn test_keywords_match_word_prefixes_only() {
        // "contest" contains "test" but no word starts with it
        assert_eq!(TaskCategory::from_task_type("contest_entry"), TaskCategory::General);
    }

    #[test]
    fn test_human_title() {
        assert_eq!(human_title("write_referral_letter"), "Write Referral Letter");
        assert_eq!(human_title("SEND_EMAIL"), "Send Email");
    }

    #[test]
    fn test_from_api_assigns_positional_id() {
        let api = ApiTask {
            task_type: "send_email".to_string(),
            title: "Email labs".to_string(),
            prompt: Some("Send results".to_string()),
            description: None,
        };
        let task = Task::from_api(0, api);
        assert_eq!(task.id.as_str(), "task-1");
        assert_eq!(task.category, TaskCategory::Send);
        assert_eq!(task.icon(), "mail");
        assert!(!task.completed);
    }

    #[test]
    fn test_from_api_fills_missing_title() {
        let api = ApiTask {
            task_type: "order_test".to_string(),
            title: "  ".to_string(),
            prompt: Some(String::new()),
            description: None,
        };
        let task = Task::from_api(2, api);
        assert_eq!(task.title, "Order Test");
        assert_eq!(task.prompt, None);
        assert_eq!(task.id.as_str(), "task-3");
    }
}
