//! Strongly-typed identifiers for dashboard entities
//!
//! Task, patient, and session identifiers are opaque strings assigned either
//! by the backend or (for tasks) positionally by the client. Wrapping them in
//! newtypes prevents a patient id from being passed where a task id is
//! expected. Correlation ids are client-generated UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! define_string_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string value
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the human label for this identifier kind
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::validation(concat!($label, " must not be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(TaskId, "task id");
define_string_id!(PatientId, "patient id");
define_string_id!(SessionId, "session id");

const TASK_ID_PREFIX: &str = "task-";

impl TaskId {
    /// Creates the client-side id for the task at `index` in a list response
    ///
    /// The backend list carries no ids, so numbering is positional and
    /// one-based: index 0 becomes `task-1`. These ids are only stable within
    /// one fetch cycle.
    pub fn positional(index: usize) -> Self {
        Self(format!("{}{}", TASK_ID_PREFIX, index + 1))
    }

    /// Returns the one-based position encoded in a positional id, if any
    pub fn position(&self) -> Option<usize> {
        self.0
            .strip_prefix(TASK_ID_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n > 0)
    }
}

/// Per-request correlation identifier sent to the backend for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Creates a new time-ordered correlation id (v7)
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
