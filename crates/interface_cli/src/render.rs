//! Plain-text rendering of the dashboard

use std::fmt::Write;

use domain_tasks::view::{DashboardView, DetailBody, DetailPane, ExecuteBar, PatientHeader, TaskListRow};
use domain_tasks::{Notification, NotificationLevel, Task};

pub const HELP: &str = "\
Commands:
  show                 redraw the dashboard
  select <n>           select task n (or task-n)
  generate [n]         generate content for a task
  edit <text>          replace the selected draft (\\n for newlines)
  reset [n]            discard edits
  approve [n]          toggle approval
  execute              execute all approved tasks
  reload               fetch the task list again
  patient              show patient details
  history              list tasks executed this session
  quit                 exit";

fn row_marker(row: &TaskListRow) -> &'static str {
    if row.is_generating {
        "..."
    } else if row.is_approved {
        "[x]"
    } else if row.has_content {
        "[ ]"
    } else {
        "   "
    }
}

fn render_row(out: &mut String, row: &TaskListRow) {
    let cursor = if row.is_selected { '>' } else { ' ' };
    let edited = if row.is_edited { " (edited)" } else { "" };
    let _ = writeln!(
        out,
        "{} {} {:<8} {:<14} {}{}",
        cursor,
        row_marker(row),
        row.id.as_str(),
        format!("[{}]", row.category.label()),
        row.title,
        edited
    );
}

/// Patient line shown above the task list
pub fn render_patient(patient: &PatientHeader) -> String {
    format!(
        "Patient: {} | DOB {} (age {}) | session {}",
        patient.name, patient.date_of_birth, patient.age, patient.session_id
    )
}

fn render_detail(out: &mut String, detail: &DetailPane) {
    let Some(task) = &detail.task else {
        let _ = writeln!(out, "No task selected.");
        return;
    };

    let _ = writeln!(out, "{} ({})", task.title, task.task_type);
    if let Some(prompt) = &task.prompt {
        let _ = writeln!(out, "Prompt: {}", prompt);
    }

    match &detail.body {
        DetailBody::NoSelection => {}
        DetailBody::NotGenerated => {
            let _ = writeln!(out, "No preview yet. Type 'generate' to create one.");
        }
        DetailBody::Generating => {
            let _ = writeln!(out, "Generating preview...");
        }
        DetailBody::Text { content_type, buffer, edited, .. } => {
            let marker = if *edited { " (edited)" } else { "" };
            let _ = writeln!(out, "--- {}{} ---", content_type, marker);
            let _ = writeln!(out, "{}", buffer);
        }
        DetailBody::Cards { content_type, cards } => {
            let _ = writeln!(out, "--- {} ---", content_type);
            for (index, card) in cards.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", index + 1, card.title);
                let _ = writeln!(out, "   {}", card.description);
                if let Some(link) = &card.link {
                    let _ = writeln!(out, "   {}", link);
                }
            }
        }
    }

    if detail.can_approve {
        let state = if detail.is_approved { "approved" } else { "not approved" };
        let _ = writeln!(out, "Status: {}", state);
    }
}

fn render_execute_bar(out: &mut String, bar: &ExecuteBar) {
    let hint = if bar.can_execute { " (type 'execute')" } else { "" };
    let _ = writeln!(out, "{}{}", bar.label, hint);
}

/// Full dashboard screen
pub fn render_view(view: &DashboardView) -> String {
    let mut out = String::new();

    match &view.patient {
        Some(patient) => {
            let _ = writeln!(out, "{}", render_patient(patient));
        }
        None => {
            let _ = writeln!(out, "Patient: (not loaded)");
        }
    }
    let _ = writeln!(out);

    if view.rows.is_empty() {
        let _ = writeln!(out, "No pending tasks.");
    }
    for row in &view.rows {
        render_row(&mut out, row);
    }
    let _ = writeln!(out);

    render_detail(&mut out, &view.detail);
    let _ = writeln!(out);
    render_execute_bar(&mut out, &view.execute_bar);
    out
}

/// One notification line
pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "error",
    };
    let retry = if notification.retryable { " Retry the command to try again." } else { "" };
    format!("[{}] {}: {}{}", tag, notification.title, notification.message, retry)
}

/// Tasks executed this session
pub fn render_history(executed: &[Task]) -> String {
    if executed.is_empty() {
        return "Nothing executed yet.".to_string();
    }
    executed
        .iter()
        .map(|t| format!("  {} {} ({})", t.id, t.title, t.task_type))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_line() {
        let line = render_notification(&Notification::error("Generation failed", "backend down").retryable());
        assert!(line.starts_with("[error] Generation failed: backend down"));
        assert!(line.contains("Retry"));

        let line = render_notification(&Notification::success("Tasks executed", "2 tasks executed."));
        assert_eq!(line, "[ok] Tasks executed: 2 tasks executed.");
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(render_history(&[]), "Nothing executed yet.");
    }
}
