//! In-memory fixture backend
//!
//! Serves a fixed consultation: one patient, five suggested follow-up
//! actions, and canned previews keyed on the task category. Referral tasks
//! get a list of nearby specialists from a small clinic directory, every
//! other category gets a text draft. Executed batches are kept so callers
//! can inspect what would have been sent.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use tokio::sync::RwLock;

use core_kernel::{DomainPort, PatientId, PortError, SessionId};

use crate::content::{GeneratedContent, RecommendationCard};
use crate::patient::Patient;
use crate::ports::{ApiTask, ClinicalBackendPort, ExecuteBatchRequest, GenerateRequest};
use crate::task::TaskCategory;

const FIXTURE_SESSION_ID: &str = "337851254565527952685384877024185083869";
const FIXTURE_POSTCODE: &str = "3054";
const DEFAULT_SPECIALTY: &str = "cardiology";

struct Clinic {
    specialty: &'static str,
    suburb: &'static str,
    postcode: &'static str,
    title: &'static str,
    description: &'static str,
    link: &'static str,
}

const CLINIC_DIRECTORY: &[Clinic] = &[
    Clinic {
        specialty: "physiotherapy",
        suburb: "Richmond",
        postcode: "3121",
        title: "Richmond Sports & Physio Clinic",
        description: "Sports injury specialists offering neuro and musculoskeletal rehabilitation.",
        link: "https://example.com/richmond-physio",
    },
    Clinic {
        specialty: "cardiology",
        suburb: "Parkville",
        postcode: "3052",
        title: "Melbourne Heart Group",
        description: "Comprehensive cardiology care including ECG, stress tests, and heart failure management.",
        link: "https://example.com/melbourne-heart",
    },
    Clinic {
        specialty: "cardiology",
        suburb: "Box Hill",
        postcode: "3128",
        title: "Eastern Cardiology Specialists",
        description: "Diagnostic imaging, arrhythmia management, and cardiac rehab.",
        link: "https://example.com/eastern-cardiology",
    },
    Clinic {
        specialty: "psychiatry",
        suburb: "St Kilda",
        postcode: "3182",
        title: "St Kilda Mental Health & Psychiatry",
        description: "Adult and youth mental health services with focus on anxiety and mood disorders.",
        link: "https://example.com/stkilda-psychiatry",
    },
    Clinic {
        specialty: "endocrinology",
        suburb: "Carlton",
        postcode: "3053",
        title: "Carlton Endocrine & Diabetes Centre",
        description: "Diabetes, thyroid, osteoporosis and hormone disorder management.",
        link: "https://example.com/carlton-endocrine",
    },
    Clinic {
        specialty: "oncology",
        suburb: "Heidelberg",
        postcode: "3084",
        title: "Austin Oncology Unit",
        description: "Cancer care including chemotherapy, immunotherapy, and diagnostic imaging.",
        link: "https://example.com/austin-oncology",
    },
];

/// Looks up clinics for a specialty, preferring exact postcode matches
///
/// Falls back to a single generic card when the directory has no clinic for
/// the specialty.
pub fn find_nearby_specialists(specialty: &str, postcode: &str) -> Vec<RecommendationCard> {
    let specialty = specialty.trim().to_lowercase();

    let mut matches: Vec<&Clinic> = CLINIC_DIRECTORY
        .iter()
        .filter(|c| c.specialty == specialty)
        .collect();

    if !postcode.is_empty() {
        let local: Vec<&Clinic> = matches.iter().copied().filter(|c| c.postcode == postcode).collect();
        if !local.is_empty() {
            matches = local;
        }
    }

    if matches.is_empty() {
        return vec![RecommendationCard {
            title: format!("{} clinic near {}", crate::task::human_title(&specialty), postcode),
            description: format!("No exact matches found, showing nearest available {} clinic.", specialty),
            link: Some("https://example.com/nearby-specialist".to_string()),
        }];
    }

    matches
        .into_iter()
        .map(|c| RecommendationCard {
            title: c.title.to_string(),
            description: format!("{} Located in {} ({}).", c.description, c.suburb, c.postcode),
            link: Some(c.link.to_string()),
        })
        .collect()
}

fn fixture_tasks() -> Vec<ApiTask> {
    let task = |task_type: &str, title: &str, prompt: &str| ApiTask {
        task_type: task_type.to_string(),
        title: title.to_string(),
        prompt: Some(prompt.to_string()),
        description: None,
    };

    vec![
        task("send_email", "Email pathology results", "Send email to the patient about the subject of recent pathology results."),
        task("write_referral_letter", "Cardiology referral", "Write referral letter to cardiology for palpitations and exertional chest pain."),
        task("order_test", "Order lipid panel", "Order test fasting lipid panel."),
        task("book_appointment", "Book follow-up", "Book appointment with the clinic in two weeks for medication review."),
        task("print_document", "Patient pamphlet", "Print document titled Managing High Blood Pressure."),
    ]
}

fn fixture_patient() -> Patient {
    Patient {
        id: PatientId::from("patient-001"),
        name: "John Doe".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1980, 3, 15).unwrap_or_default(),
        session_id: SessionId::from(FIXTURE_SESSION_ID),
    }
}

/// In-memory backend serving fixture data
#[derive(Debug)]
pub struct FixtureBackend {
    tasks: RwLock<Vec<ApiTask>>,
    patient: Patient,
    executed: RwLock<Vec<ExecuteBatchRequest>>,
}

impl Default for FixtureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureBackend {
    /// Creates the backend with the standard consultation fixture
    pub fn new() -> Self {
        Self::with_tasks(fixture_tasks())
    }

    /// Creates the backend with a custom task list
    pub fn with_tasks(tasks: Vec<ApiTask>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            patient: fixture_patient(),
            executed: RwLock::new(Vec::new()),
        }
    }

    /// Replaces the patient returned by `fetch_patient`
    pub fn with_patient(mut self, patient: Patient) -> Self {
        self.patient = patient;
        self
    }

    /// Replaces the task list served by subsequent `list_tasks` calls
    pub async fn set_tasks(&self, tasks: Vec<ApiTask>) {
        *self.tasks.write().await = tasks;
    }

    /// Batches received so far, oldest first
    pub async fn executed_batches(&self) -> Vec<ExecuteBatchRequest> {
        self.executed.read().await.clone()
    }

    fn preview_for(request: &GenerateRequest) -> GeneratedContent {
        let title = request.task_details.title.as_str();

        match TaskCategory::from_task_type(&request.task_type) {
            TaskCategory::Referral => {
                let haystack = format!(
                    "{} {}",
                    title,
                    request.task_details.prompt.as_deref().unwrap_or_default()
                )
                .to_lowercase();
                let specialty = CLINIC_DIRECTORY
                    .iter()
                    .map(|c| c.specialty)
                    .find(|s| haystack.contains(s))
                    .unwrap_or(DEFAULT_SPECIALTY);
                GeneratedContent::cards("Nearby Specialists", find_nearby_specialists(specialty, FIXTURE_POSTCODE))
            }
            TaskCategory::Send => GeneratedContent::text("Email Draft", format!("Generated email for: {}", title)),
            TaskCategory::Documentation => GeneratedContent::text("Document", format!("Generated document for: {}", title)),
            TaskCategory::Order => GeneratedContent::text("Order", format!("Generated order for: {}", title)),
            TaskCategory::Booking => {
                GeneratedContent::text("Appointment", format!("Generated appointment details for: {}", title))
            }
            _ => GeneratedContent::text("Preview", format!("Generated content for action: {}", request.task_type)),
        }
    }
}

impl DomainPort for FixtureBackend {}

#[async_trait]
impl ClinicalBackendPort for FixtureBackend {
    async fn list_tasks(&self) -> Result<Vec<ApiTask>, PortError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn fetch_patient(&self) -> Result<Patient, PortError> {
        Ok(self.patient.clone())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedContent, PortError> {
        if request.task_type.trim().is_empty() {
            return Err(PortError::validation("taskType is required"));
        }
        Ok(Self::preview_for(&request))
    }

    async fn execute_batch(&self, request: ExecuteBatchRequest) -> Result<serde_json::Value, PortError> {
        let results: Vec<serde_json::Value> = request
            .tasks
            .iter()
            .map(|t| json!({ "taskType": t.task_type, "status": format!("Executed {}", t.task_type) }))
            .collect();
        let executed_count = request.tasks.len();

        self.executed.write().await.push(request);

        Ok(json!({
            "status": "ok",
            "executedCount": executed_count,
            "results": results,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentBody;
    use crate::ports::{ExecuteItem, TaskDetails};

    fn request(task_type: &str, title: &str, prompt: Option<&str>) -> GenerateRequest {
        GenerateRequest {
            task_type: task_type.to_string(),
            task_details: TaskDetails {
                id: "task-1".to_string(),
                title: title.to_string(),
                task_type: task_type.to_string(),
                prompt: prompt.map(str::to_string),
                description: None,
            },
        }
    }

    #[test]
    fn test_find_nearby_specialists_prefers_postcode() {
        let cards = find_nearby_specialists("Cardiology", "3128");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Eastern Cardiology Specialists");
        assert!(cards[0].description.contains("Box Hill (3128)"));
    }

    #[test]
    fn test_find_nearby_specialists_without_postcode_match() {
        let cards = find_nearby_specialists("cardiology", "9999");
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn test_find_nearby_specialists_fallback() {
        let cards = find_nearby_specialists("dermatology", "3054");
        assert_eq!(cards.len(), 1);
        assert!(cards[0].title.contains("Dermatology"));
    }

    #[tokio::test]
    async fn test_fixture_lists_five_tasks() {
        let backend = FixtureBackend::new();
        let tasks = backend.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[0].task_type, "send_email");
    }

    #[tokio::test]
    async fn test_referral_generates_cards() {
        let backend = FixtureBackend::new();
        let content = backend
            .generate(request("write_referral_letter", "Referral", Some("refer to oncology")))
            .await
            .unwrap();

        assert_eq!(content.content_type, "Nearby Specialists");
        let cards = content.content.cards().unwrap();
        assert_eq!(cards[0].title, "Austin Oncology Unit");
    }

    #[tokio::test]
    async fn test_email_generates_text() {
        let backend = FixtureBackend::new();
        let content = backend.generate(request("send_email", "Email labs", None)).await.unwrap();
        assert_eq!(content.content_type, "Email Draft");
        assert_eq!(content.content.as_text(), Some("Generated email for: Email labs"));
    }

    #[tokio::test]
    async fn test_empty_task_type_is_rejected() {
        let backend = FixtureBackend::new();
        assert!(backend.generate(request(" ", "x", None)).await.is_err());
    }

    #[tokio::test]
    async fn test_execute_batch_records_and_reports_count() {
        let backend = FixtureBackend::new();
        let response = backend
            .execute_batch(ExecuteBatchRequest {
                tasks: vec![ExecuteItem {
                    task_type: "send_email".to_string(),
                    content: ContentBody::Text("Hi".to_string()),
                }],
                executed_at: "2024-05-01T10:00:00+00:00".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response["executedCount"], 1);
        assert_eq!(backend.executed_batches().await.len(), 1);
    }
}
