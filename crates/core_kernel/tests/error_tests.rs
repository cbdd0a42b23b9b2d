//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;
use std::error::Error;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_port_error_conflict_is_not_transient() {
    let error = PortError::Conflict {
        message: "execute_batch rejected with 409 Conflict".to_string(),
    };
    assert!(!error.is_transient());
    assert!(error.to_string().starts_with("Conflict:"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("backend_url is empty");
    assert!(error.to_string().contains("backend_url"));
}

#[test]
fn test_port_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = PortError::Connection {
        message: "GET /api/tasks".to_string(),
        source: Some(Box::new(io)),
    };

    assert!(error.is_transient());
    assert!(error.source().is_some());
    assert!(error.to_string().contains("/api/tasks"));
}

#[test]
fn test_port_error_service_unavailable_is_transient() {
    let error = PortError::ServiceUnavailable {
        service: "clinical backend".to_string(),
    };
    assert!(error.is_transient());
    assert!(!PortError::internal("boom").is_transient());
}
