//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the dashboard. These fixtures are
//! designed to be consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{PatientId, SessionId};
use domain_tasks::ports::ApiTask;
use domain_tasks::{GeneratedContent, Patient, RecommendationCard};

use crate::builders::ApiTaskBuilder;

/// Fixture for backend task lists
pub struct TaskFixtures;

impl TaskFixtures {
    /// An email task with a prompt
    pub fn send_email() -> ApiTask {
        ApiTaskBuilder::new("send_email")
            .with_title("Email pathology results")
            .with_prompt("Send email about recent pathology results.")
            .build()
    }

    /// A referral task
    pub fn referral() -> ApiTask {
        ApiTaskBuilder::new("write_referral_letter")
            .with_title("Cardiology referral")
            .with_prompt("Refer to cardiology for palpitations.")
            .build()
    }

    /// An order task
    pub fn order_test() -> ApiTask {
        ApiTaskBuilder::new("order_test")
            .with_title("Order lipid panel")
            .build()
    }

    /// A booking task
    pub fn book_appointment() -> ApiTask {
        ApiTaskBuilder::new("book_appointment")
            .with_title("Book follow-up")
            .build()
    }

    /// The three-task list used by most scenarios: email, referral, order
    pub fn three_tasks() -> Vec<ApiTask> {
        vec![Self::send_email(), Self::referral(), Self::order_test()]
    }

    /// Four tasks: the standard three plus a booking
    pub fn four_tasks() -> Vec<ApiTask> {
        let mut tasks = Self::three_tasks();
        tasks.push(Self::book_appointment());
        tasks
    }
}

/// Fixture for patient data
pub struct PatientFixtures;

impl PatientFixtures {
    /// Standard test patient
    pub fn jane_citizen() -> Patient {
        Patient {
            id: PatientId::from("patient-042"),
            name: "Jane Citizen".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 6, 1).unwrap(),
            session_id: SessionId::from("session-042"),
        }
    }
}

/// Fixture for generated content
pub struct ContentFixtures;

impl ContentFixtures {
    /// A text email draft
    pub fn email_draft(body: &str) -> GeneratedContent {
        GeneratedContent::text("Email Draft", body)
    }

    /// A card list with two specialists
    pub fn specialists() -> GeneratedContent {
        GeneratedContent::cards(
            "Nearby Specialists",
            vec![
                RecommendationCard {
                    title: "Melbourne Heart Group".to_string(),
                    description: "Cardiology care in Parkville.".to_string(),
                    link: Some("https://example.com/melbourne-heart".to_string()),
                },
                RecommendationCard {
                    title: "Eastern Cardiology Specialists".to_string(),
                    description: "Cardiology care in Box Hill.".to_string(),
                    link: None,
                },
            ],
        )
    }
}
