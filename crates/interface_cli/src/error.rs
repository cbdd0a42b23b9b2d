//! Front end errors

use thiserror::Error;

/// Errors from parsing a command line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (type 'help' for a list)")]
    Unknown(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Not a task reference: {0} (use a number or task-N)")]
    InvalidTask(String),

    #[error("No task selected")]
    NoSelection,
}
