//! Clinical Backend HTTP Adapter
//!
//! Implements [`ClinicalBackendPort`] over the backend's REST API using a
//! pooled `reqwest::Client`. Requests are sent once; a failure is returned
//! to the caller as a [`PortError`] and never retried here.
//!
//! Every request carries an `x-correlation-id` header so backend logs can be
//! joined with the dashboard's traces. A request timeout is only applied when
//! one is configured; otherwise timing is left to the transport. Any 2xx
//! answer to an execute-batch call counts as success, whatever its body.
//!
//! ```rust,ignore
//! let config = ExternalSystemConfig::new("http://localhost:8000")
//!     .with_timeout(Duration::from_secs(30));
//! let backend = HttpBackendAdapter::new(config)?;
//! let tasks = backend.list_tasks().await?;
//! ```

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use core_kernel::{DomainPort, ExternalSystemConfig, OperationMetadata, PortError};
use domain_tasks::ports::{ApiTask, ClinicalBackendPort, ExecuteBatchRequest, GenerateRequest};
use domain_tasks::{GeneratedContent, Patient};

use crate::error::{map_status, map_transport};

pub const CORRELATION_HEADER: &str = "x-correlation-id";

const TASKS_PATH: &str = "/api/tasks";
const PATIENT_PATH: &str = "/api/patient";
const GENERATE_PATH: &str = "/api/tasks/generate";
const EXECUTE_BATCH_PATH: &str = "/api/tasks/execute-batch";

/// HTTP adapter for the clinical backend
#[derive(Debug, Clone)]
pub struct HttpBackendAdapter {
    config: ExternalSystemConfig,
    client: Client,
}

impl HttpBackendAdapter {
    /// Creates an adapter for the configured backend
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL, optional timeout, and static headers
    ///
    /// # Returns
    ///
    /// The adapter, or a validation error if a configured header is not a
    /// legal HTTP header
    pub fn new(config: ExternalSystemConfig) -> Result<Self, PortError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| PortError::validation(format!("invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| PortError::validation(format!("invalid value for header {}", name)))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| PortError::Internal {
            message: "failed to build HTTP client".to_string(),
            source: Some(Box::new(e)),
        })?;

        Ok(Self { config, client })
    }

    /// Returns the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn get<R: DeserializeOwned>(&self, operation: &'static str, path: &str) -> Result<R, PortError> {
        let request = self.client.get(self.config.endpoint(path));
        let body = self.send(OperationMetadata::for_operation(operation), path, request).await?;
        decode(operation, path, &body)
    }

    async fn post<B>(&self, metadata: OperationMetadata, path: &str, body: &B) -> Result<String, PortError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.client.post(self.config.endpoint(path)).json(body);
        self.send(metadata, path, request).await
    }

    /// Sends one request and returns the body of a 2xx response
    async fn send(&self, metadata: OperationMetadata, path: &str, request: RequestBuilder) -> Result<String, PortError> {
        let operation = metadata.operation;
        let started = Instant::now();

        tracing::debug!(
            operation,
            path,
            correlation_id = %metadata.correlation_id,
            context = ?metadata.context,
            "Sending backend request"
        );

        let response = request
            .header(CORRELATION_HEADER, metadata.correlation_id.to_string())
            .send()
            .await
            .map_err(|e| {
                let error = map_transport(operation, self.config.request_timeout(), e);
                tracing::warn!(
                    operation,
                    path,
                    correlation_id = %metadata.correlation_id,
                    context = ?metadata.context,
                    error = %error,
                    "Backend request failed"
                );
                error
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| map_transport(operation, self.config.request_timeout(), e))?;

        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            let error = map_status(operation, path, status, retry_after, &body);
            tracing::warn!(
                operation,
                path,
                status = status.as_u16(),
                elapsed_ms,
                correlation_id = %metadata.correlation_id,
                context = ?metadata.context,
                error = %error,
                "Backend returned an error status"
            );
            return Err(error);
        }

        tracing::debug!(operation, status = status.as_u16(), elapsed_ms, "Backend request completed");
        Ok(body)
    }
}

fn decode<R: DeserializeOwned>(operation: &str, path: &str, body: &str) -> Result<R, PortError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(operation, path, error = %e, "Backend response could not be decoded");
        PortError::transformation(format!("{}: {}", operation, e))
    })
}

/// Reads an execute-batch acknowledgement
///
/// The batch has already run once any 2xx arrives, so an empty or non-JSON
/// body becomes `Value::Null` instead of an error.
fn decode_acknowledgement(body: &str) -> serde_json::Value {
    if body.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Execute-batch acknowledgement is not JSON");
        serde_json::Value::Null
    })
}

impl DomainPort for HttpBackendAdapter {}

#[async_trait]
impl ClinicalBackendPort for HttpBackendAdapter {
    async fn list_tasks(&self) -> Result<Vec<ApiTask>, PortError> {
        self.get("list_tasks", TASKS_PATH).await
    }

    async fn fetch_patient(&self) -> Result<Patient, PortError> {
        self.get("fetch_patient", PATIENT_PATH).await
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedContent, PortError> {
        let metadata = OperationMetadata::for_operation("generate")
            .with_context("task_id", request.task_details.id.clone())
            .with_context("task_type", request.task_type.clone());
        let body = self.post(metadata, GENERATE_PATH, &request).await?;
        decode("generate", GENERATE_PATH, &body)
    }

    async fn execute_batch(&self, request: ExecuteBatchRequest) -> Result<serde_json::Value, PortError> {
        let metadata =
            OperationMetadata::for_operation("execute_batch").with_context("count", request.tasks.len().to_string());
        let body = self.post(metadata, EXECUTE_BATCH_PATH, &request).await?;
        Ok(decode_acknowledgement(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_header_is_rejected() {
        let config = ExternalSystemConfig::new("http://localhost:8000").with_header("bad header", "x");
        assert!(matches!(
            HttpBackendAdapter::new(config),
            Err(PortError::Validation { .. })
        ));
    }

    #[test]
    fn test_acknowledgement_is_lenient() {
        assert_eq!(decode_acknowledgement(""), serde_json::Value::Null);
        assert_eq!(decode_acknowledgement("  \n"), serde_json::Value::Null);
        assert_eq!(decode_acknowledgement("done"), serde_json::Value::Null);
        assert_eq!(decode_acknowledgement(r#"{"executedCount":2}"#)["executedCount"], 2);
    }

    #[test]
    fn test_base_url() {
        let adapter = HttpBackendAdapter::new(ExternalSystemConfig::new("http://backend:8000/")).unwrap();
        assert_eq!(adapter.base_url(), "http://backend:8000/");
    }
}
