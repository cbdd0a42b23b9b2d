//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for dashboard state that give
//! more meaningful error messages than standard assertions.

use core_kernel::TaskId;
use domain_tasks::{DashboardService, Notification, NotificationLevel};

/// Asserts the ids of the active task list, in order
pub async fn assert_task_ids(service: &DashboardService, expected: &[TaskId]) {
    let actual: Vec<TaskId> = service.tasks().await.into_iter().map(|t| t.id).collect();
    assert_eq!(actual, expected, "Task list mismatch");
}

/// Asserts that a record exists and holds the given text preview
pub async fn assert_text_record(service: &DashboardService, id: &TaskId, expected: &str) {
    let record = service
        .record(id)
        .await
        .unwrap_or_else(|| panic!("Expected a generation record for {}", id));
    assert_eq!(
        record.content().content.as_text(),
        Some(expected),
        "Unexpected generated text for {}",
        id
    );
}

/// Asserts that no record exists for the task
pub async fn assert_no_record(service: &DashboardService, id: &TaskId) {
    assert!(
        service.record(id).await.is_none(),
        "Expected no generation record for {}",
        id
    );
}

/// Asserts that exactly one notification of `level` was raised and returns it
///
/// # Panics
///
/// Panics if the count of notifications at that level is not one
pub fn assert_single_notification(notifications: &[Notification], level: NotificationLevel) -> Notification {
    let matching: Vec<&Notification> = notifications.iter().filter(|n| n.level == level).collect();
    assert_eq!(
        matching.len(),
        1,
        "Expected exactly one {:?} notification, got {:?}",
        level,
        notifications
    );
    matching[0].clone()
}
