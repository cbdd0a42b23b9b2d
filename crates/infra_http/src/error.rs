//! Mapping of HTTP failures onto port errors
//!
//! - 404 -> `PortError::NotFound`
//! - 401/403 -> `PortError::Unauthorized`
//! - 409 -> `PortError::Conflict`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Other non-success -> `PortError::Internal`
//! - Connect failures -> `PortError::Connection`
//! - Timeouts -> `PortError::Timeout`
//! - Undecodable bodies -> `PortError::Transformation`

use std::time::Duration;

use reqwest::StatusCode;

use core_kernel::PortError;

const BODY_EXCERPT_LEN: usize = 200;

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

/// Maps a non-success status to a port error
pub fn map_status(
    operation: &str,
    path: &str,
    status: StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> PortError {
    match status.as_u16() {
        404 => PortError::not_found(path),
        401 | 403 => PortError::Unauthorized {
            message: format!("{} rejected with {}", operation, status),
        },
        409 => PortError::Conflict {
            message: format!("{} rejected with {}: {}", operation, status, excerpt(body)),
        },
        429 => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(0),
        },
        500..=599 => PortError::ServiceUnavailable {
            service: format!("{} returned {}", path, status),
        },
        _ => PortError::internal(format!(
            "{} failed with {}: {}",
            operation,
            status,
            excerpt(body)
        )),
    }
}

/// Maps a transport-level failure to a port error
pub fn map_transport(operation: &str, timeout: Option<Duration>, error: reqwest::Error) -> PortError {
    if error.is_timeout() {
        return PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout.map(|t| t.as_millis() as u64).unwrap_or(0),
        };
    }

    if error.is_connect() {
        return PortError::Connection {
            message: format!("{}: could not connect to backend", operation),
            source: Some(Box::new(error)),
        };
    }

    if error.is_decode() {
        return PortError::transformation(format!("{}: {}", operation, error));
    }

    PortError::Internal {
        message: format!("{} failed", operation),
        source: Some(Box::new(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let map = |code: u16| map_status("list_tasks", "/api/tasks", StatusCode::from_u16(code).unwrap(), Some(7), "");

        assert!(map(404).is_not_found());
        assert!(matches!(map(401), PortError::Unauthorized { .. }));
        assert!(matches!(map(403), PortError::Unauthorized { .. }));
        assert!(matches!(map(409), PortError::Conflict { .. }));
        assert!(matches!(map(429), PortError::RateLimited { retry_after_secs: 7 }));
        assert!(matches!(map(503), PortError::ServiceUnavailable { .. }));
        assert!(matches!(map(418), PortError::Internal { .. }));
    }

    #[test]
    fn test_server_errors_are_transient() {
        let error = map_status("generate", "/api/tasks/generate", StatusCode::INTERNAL_SERVER_ERROR, None, "boom");
        assert!(error.is_transient());
    }

    #[test]
    fn test_body_excerpt_is_bounded() {
        let body = "x".repeat(1000);
        let error = map_status("generate", "/api/tasks/generate", StatusCode::BAD_REQUEST, None, &body);
        assert!(error.to_string().len() < 400);
    }
}
