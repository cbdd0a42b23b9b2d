//! Patient display context

use chrono::{NaiveDate, Utc, Datelike};
use serde::{Deserialize, Serialize};

use core_kernel::{PatientId, SessionId};

/// The patient the current consultation session belongs to
///
/// Read-only; fetched once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub session_id: SessionId,
}

impl Patient {
    /// Age in whole years on `on`
    pub fn age_on(&self, on: NaiveDate) -> u32 {
        let mut age = on.year() - self.date_of_birth.year();
        if (on.month(), on.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }

    /// Age in whole years today
    pub fn age(&self) -> u32 {
        self.age_on(Utc::now().date_naive())
    }
}
