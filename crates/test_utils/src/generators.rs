//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating backend task lists and
//! user edit sequences.

use domain_tasks::ports::ApiTask;
use proptest::prelude::*;

/// Action types the backend is known to emit
pub const KNOWN_TASK_TYPES: &[&str] = &[
    "send_email",
    "write_referral_letter",
    "order_test",
    "book_appointment",
    "print_document",
    "store_patient_data",
    "payment_reminder",
];

/// Strategy for a known action type
pub fn task_type_strategy() -> impl Strategy<Value = String> {
    proptest::sample::select(KNOWN_TASK_TYPES).prop_map(str::to_string)
}

/// Strategy for arbitrary snake_case action types, including unknown ones
pub fn any_task_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![task_type_strategy(), "[a-z]{1,8}(_[a-z]{1,8}){0,3}"]
}

/// Strategy for a single backend task
pub fn api_task_strategy() -> impl Strategy<Value = ApiTask> {
    (
        task_type_strategy(),
        proptest::option::of("[A-Za-z ]{0,24}"),
        proptest::option::of("[A-Za-z .]{1,40}"),
    )
        .prop_map(|(task_type, title, prompt)| ApiTask {
            task_type,
            title: title.unwrap_or_default(),
            prompt,
            description: None,
        })
}

/// Strategy for a task list of 1..=max tasks
pub fn api_task_list_strategy(max: usize) -> impl Strategy<Value = Vec<ApiTask>> {
    proptest::collection::vec(api_task_strategy(), 1..=max)
}

/// Strategy for a sequence of edit buffer values
pub fn edit_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[ -~]{0,64}", 1..8)
}
