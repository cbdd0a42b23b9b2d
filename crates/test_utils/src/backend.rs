//! Scripted Backend Double
//!
//! A [`ClinicalBackendPort`] implementation whose behaviour tests control:
//! failures can be injected per operation, generation responses can be held
//! until released, and every request is recorded for inspection.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{Mutex, Notify, RwLock};

use core_kernel::{DomainPort, PortError, TaskId};
use domain_tasks::ports::{ApiTask, ClinicalBackendPort, ExecuteBatchRequest, GenerateRequest};
use domain_tasks::{GeneratedContent, Patient};

use crate::fixtures::PatientFixtures;

/// Backend double with failure injection and gated responses
pub struct ScriptedBackend {
    tasks: RwLock<Vec<ApiTask>>,
    patient: RwLock<Patient>,
    responses: RwLock<HashMap<String, GeneratedContent>>,
    fail_list: RwLock<bool>,
    fail_patient: RwLock<bool>,
    fail_execute: RwLock<bool>,
    fail_generation: RwLock<HashSet<String>>,
    generation_gates: Mutex<HashMap<String, Arc<Notify>>>,
    execution_gate: Mutex<Option<Arc<Notify>>>,
    list_calls: Mutex<usize>,
    generate_requests: Mutex<Vec<GenerateRequest>>,
    execute_requests: Mutex<Vec<ExecuteBatchRequest>>,
}

impl ScriptedBackend {
    /// Creates a backend serving the given tasks and the standard patient
    pub fn new(tasks: Vec<ApiTask>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            patient: RwLock::new(PatientFixtures::jane_citizen()),
            responses: RwLock::new(HashMap::new()),
            fail_list: RwLock::new(false),
            fail_patient: RwLock::new(false),
            fail_execute: RwLock::new(false),
            fail_generation: RwLock::new(HashSet::new()),
            generation_gates: Mutex::new(HashMap::new()),
            execution_gate: Mutex::new(None),
            list_calls: Mutex::new(0),
            generate_requests: Mutex::new(Vec::new()),
            execute_requests: Mutex::new(Vec::new()),
        }
    }

    /// Wraps the backend for a service under test
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    // ========================================================================
    // Scripting
    // ========================================================================

    pub async fn set_tasks(&self, tasks: Vec<ApiTask>) {
        *self.tasks.write().await = tasks;
    }

    pub async fn set_patient(&self, patient: Patient) {
        *self.patient.write().await = patient;
    }

    /// Serves `content` for every generation of `task_type`
    pub async fn respond_with(&self, task_type: &str, content: GeneratedContent) {
        self.responses.write().await.insert(task_type.to_string(), content);
    }

    pub async fn fail_list_tasks(&self, fail: bool) {
        *self.fail_list.write().await = fail;
    }

    pub async fn fail_patient(&self, fail: bool) {
        *self.fail_patient.write().await = fail;
    }

    pub async fn fail_execute(&self, fail: bool) {
        *self.fail_execute.write().await = fail;
    }

    /// Makes generation for `task_id` fail until [`Self::succeed_generation`]
    pub async fn fail_generation(&self, task_id: &TaskId) {
        self.fail_generation.write().await.insert(task_id.to_string());
    }

    pub async fn succeed_generation(&self, task_id: &TaskId) {
        self.fail_generation.write().await.remove(task_id.as_str());
    }

    /// Holds generation responses for `task_id` until released
    pub async fn hold_generation(&self, task_id: &TaskId) {
        self.generation_gates
            .lock()
            .await
            .insert(task_id.to_string(), Arc::new(Notify::new()));
    }

    /// Lets one held generation for `task_id` complete
    pub async fn release_generation(&self, task_id: &TaskId) {
        if let Some(gate) = self.generation_gates.lock().await.remove(task_id.as_str()) {
            gate.notify_one();
        }
    }

    /// Holds the next batch execution until released
    pub async fn hold_execution(&self) {
        *self.execution_gate.lock().await = Some(Arc::new(Notify::new()));
    }

    pub async fn release_execution(&self) {
        if let Some(gate) = self.execution_gate.lock().await.take() {
            gate.notify_one();
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub async fn list_calls(&self) -> usize {
        *self.list_calls.lock().await
    }

    /// Generation requests received so far, oldest first
    pub async fn generate_requests(&self) -> Vec<GenerateRequest> {
        self.generate_requests.lock().await.clone()
    }

    /// Number of generation requests issued for `task_id`
    pub async fn generate_calls(&self, task_id: &TaskId) -> usize {
        self.generate_requests
            .lock()
            .await
            .iter()
            .filter(|r| r.task_details.id == task_id.as_str())
            .count()
    }

    pub async fn execute_requests(&self) -> Vec<ExecuteBatchRequest> {
        self.execute_requests.lock().await.clone()
    }

    /// Yields until `count` generation requests for `task_id` were received
    ///
    /// # Panics
    ///
    /// Panics if the requests never arrive.
    pub async fn wait_for_generate_calls(&self, task_id: &TaskId, count: usize) {
        for _ in 0..10_000 {
            if self.generate_calls(task_id).await >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} generate call(s) for {}", count, task_id);
    }

    /// Yields until `count` execution requests were received
    ///
    /// # Panics
    ///
    /// Panics if the requests never arrive.
    pub async fn wait_for_execute_calls(&self, count: usize) {
        for _ in 0..10_000 {
            if self.execute_requests.lock().await.len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} execute call(s)", count);
    }

    fn unavailable() -> PortError {
        PortError::ServiceUnavailable {
            service: "scripted backend".to_string(),
        }
    }
}

impl DomainPort for ScriptedBackend {}

#[async_trait]
impl ClinicalBackendPort for ScriptedBackend {
    async fn list_tasks(&self) -> Result<Vec<ApiTask>, PortError> {
        *self.list_calls.lock().await += 1;
        if *self.fail_list.read().await {
            return Err(Self::unavailable());
        }
        Ok(self.tasks.read().await.clone())
    }

    async fn fetch_patient(&self) -> Result<Patient, PortError> {
        if *self.fail_patient.read().await {
            return Err(Self::unavailable());
        }
        Ok(self.patient.read().await.clone())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedContent, PortError> {
        let task_id = request.task_details.id.clone();
        self.generate_requests.lock().await.push(request.clone());

        let gate = self.generation_gates.lock().await.get(&task_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_generation.read().await.contains(&task_id) {
            return Err(Self::unavailable());
        }

        let scripted = self.responses.read().await.get(&request.task_type).cloned();
        Ok(scripted.unwrap_or_else(|| {
            GeneratedContent::text("Preview", format!("Generated content for: {}", request.task_details.title))
        }))
    }

    async fn execute_batch(&self, request: ExecuteBatchRequest) -> Result<serde_json::Value, PortError> {
        let count = request.tasks.len();
        self.execute_requests.lock().await.push(request);

        let gate = self.execution_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if *self.fail_execute.read().await {
            return Err(Self::unavailable());
        }
        Ok(json!({ "status": "ok", "executedCount": count }))
    }
}
