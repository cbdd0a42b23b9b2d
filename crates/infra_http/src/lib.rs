//! HTTP Infrastructure
//!
//! Adapter that talks to the clinical backend over its JSON REST contract.
//!
//! | Operation     | Request                           |
//! |---------------|-----------------------------------|
//! | List tasks    | `GET /api/tasks`                  |
//! | Fetch patient | `GET /api/patient`                |
//! | Generate      | `POST /api/tasks/generate`        |
//! | Execute batch | `POST /api/tasks/execute-batch`   |

pub mod adapter;
pub mod error;

pub use adapter::HttpBackendAdapter;
