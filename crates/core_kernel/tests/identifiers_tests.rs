//! Unit tests for the Identifiers module
//!
//! Tests cover positional task ids, string id parsing, and correlation ids.

use core_kernel::{TaskId, PatientId, SessionId, CorrelationId};
use proptest::prelude::*;

mod task_id_tests {
    use super::*;

    #[test]
    fn test_positional_ids_follow_list_order() {
        let ids: Vec<TaskId> = (0..3).map(TaskId::positional).collect();
        assert_eq!(ids[0].as_str(), "task-1");
        assert_eq!(ids[1].as_str(), "task-2");
        assert_eq!(ids[2].as_str(), "task-3");
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        let id: TaskId = "  task-7 ".parse().unwrap();
        assert_eq!(id, TaskId::new("task-7"));
        assert_eq!(id.position(), Some(7));
    }

    #[test]
    fn test_display_is_raw_value() {
        assert_eq!(TaskId::new("task-2").to_string(), "task-2");
    }

    #[test]
    fn test_serde_transparent() {
        let id = TaskId::positional(0);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"task-1\"");
    }

    proptest! {
        #[test]
        fn prop_positional_position_inverse(index in 0usize..10_000) {
            prop_assert_eq!(TaskId::positional(index).position(), Some(index + 1));
        }
    }
}

mod other_id_tests {
    use super::*;

    #[test]
    fn test_patient_and_session_ids_keep_backend_value() {
        let patient = PatientId::from("patient-001");
        let session = SessionId::from("337851254565527952685384877024185083869".to_string());
        assert_eq!(patient.as_str(), "patient-001");
        assert_eq!(session.as_ref(), "337851254565527952685384877024185083869");
    }

    #[test]
    fn test_labels() {
        assert_eq!(PatientId::label(), "patient id");
        assert_eq!(SessionId::label(), "session id");
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        assert_ne!(CorrelationId::new(), CorrelationId::new());
    }
}
