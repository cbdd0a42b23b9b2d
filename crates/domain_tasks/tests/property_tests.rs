//! Property tests for store and cache invariants

use std::collections::HashSet;

use proptest::prelude::*;

use core_kernel::TaskId;
use domain_tasks::{GeneratedContent, GenerationCache, TaskCategory, TaskStore};
use test_utils::{any_task_type_strategy, api_task_list_strategy, edit_sequence_strategy, tasks_from_api};

proptest! {
    #[test]
    fn test_positional_ids_are_unique(api_tasks in api_task_list_strategy(12)) {
        let tasks = tasks_from_api(api_tasks);
        let ids: HashSet<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(ids.len(), tasks.len());
    }

    #[test]
    fn test_at_most_one_record_per_task(inserts in proptest::collection::vec(0usize..5, 1..20)) {
        let mut cache = GenerationCache::new();
        let mut expected = HashSet::new();
        for position in inserts {
            let id = TaskId::positional(position);
            let fresh = cache.insert(id.clone(), "send_email", GeneratedContent::text("Email Draft", "x"));
            prop_assert_eq!(fresh, expected.insert(id));
        }
        prop_assert_eq!(cache.len(), expected.len());
    }

    #[test]
    fn test_toggle_twice_restores_approval(toggles in 0usize..6) {
        let mut cache = GenerationCache::new();
        let id = TaskId::positional(0);
        cache.insert(id.clone(), "send_email", GeneratedContent::text("Email Draft", "x"));
        for _ in 0..toggles {
            cache.toggle_approval(&id);
        }
        let before = cache.get(&id).map(|r| r.is_approved());

        cache.toggle_approval(&id);
        cache.toggle_approval(&id);
        prop_assert_eq!(cache.get(&id).map(|r| r.is_approved()), before);
    }

    #[test]
    fn test_edits_never_touch_original(original in "[ -~]{0,64}", edits in edit_sequence_strategy()) {
        let mut cache = GenerationCache::new();
        let id = TaskId::positional(0);
        cache.insert(id.clone(), "send_email", GeneratedContent::text("Email Draft", original.clone()));

        for edit in &edits {
            prop_assert!(cache.edit_content(&id, edit.clone()));
        }

        let record = cache.get(&id).unwrap();
        prop_assert_eq!(record.content().content.as_text(), Some(original.as_str()));
        prop_assert_eq!(record.edited_text(), edits.last().map(String::as_str));
    }

    #[test]
    fn test_mark_executed_removes_exactly_the_set(
        api_tasks in api_task_list_strategy(10),
        picks in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let mut store = TaskStore::new();
        store.replace(tasks_from_api(api_tasks));
        let executed: HashSet<TaskId> = store
            .tasks()
            .iter()
            .zip(picks.iter())
            .filter(|(_, pick)| **pick)
            .map(|(t, _)| t.id.clone())
            .collect();
        let before = store.len();

        store.mark_executed(&executed);

        prop_assert_eq!(store.len(), before - executed.len());
        prop_assert!(store.tasks().iter().all(|t| !executed.contains(&t.id)));
        prop_assert_eq!(store.executed().len(), executed.len());
        if let Some(selected) = store.selected_id() {
            prop_assert!(store.contains(selected));
        }
    }

    #[test]
    fn test_category_mapping_is_total(task_type in any_task_type_strategy()) {
        let category = TaskCategory::from_task_type(&task_type);
        prop_assert!(TaskCategory::ALL.contains(&category));
        prop_assert!(!category.icon().is_empty());
    }
}
