//! Terminal command parsing

use std::str::FromStr;

use core_kernel::TaskId;

use crate::error::CommandError;

/// A user command entered at the prompt
///
/// Commands that take an optional task act on the selected task when none
/// is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Redraw the dashboard
    Show,
    Select(TaskId),
    Generate(Option<TaskId>),
    /// Replace the edit buffer of the selected task
    Edit(String),
    Reset(Option<TaskId>),
    Approve(Option<TaskId>),
    Execute,
    Reload,
    Patient,
    History,
    Help,
    Quit,
}

/// Parses a task reference: `task-3` or the bare position `3`
pub fn parse_task_ref(value: &str) -> Result<TaskId, CommandError> {
    let value = value.trim();
    if let Ok(position) = value.parse::<usize>() {
        if position == 0 {
            return Err(CommandError::InvalidTask(value.to_string()));
        }
        return Ok(TaskId::positional(position - 1));
    }

    let id = TaskId::from_str(value).map_err(|_| CommandError::InvalidTask(value.to_string()))?;
    if id.position().is_none() {
        return Err(CommandError::InvalidTask(value.to_string()));
    }
    Ok(id)
}

fn optional_task(argument: &str) -> Result<Option<TaskId>, CommandError> {
    if argument.is_empty() {
        Ok(None)
    } else {
        parse_task_ref(argument).map(Some)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "show" | "list" | "ls" => Ok(Command::Show),
            "select" | "s" => {
                if argument.is_empty() {
                    return Err(CommandError::MissingArgument { command: "select", argument: "task" });
                }
                parse_task_ref(argument).map(Command::Select)
            }
            "generate" | "gen" | "g" => optional_task(argument).map(Command::Generate),
            "edit" | "e" => {
                if argument.is_empty() {
                    return Err(CommandError::MissingArgument { command: "edit", argument: "text" });
                }
                Ok(Command::Edit(argument.replace("\\n", "\n")))
            }
            "reset" => optional_task(argument).map(Command::Reset),
            "approve" | "a" => optional_task(argument).map(Command::Approve),
            "execute" | "exec" | "x" => Ok(Command::Execute),
            "reload" | "refresh" => Ok(Command::Reload),
            "patient" => Ok(Command::Patient),
            "history" => Ok(Command::History),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_references() {
        assert_eq!(parse_task_ref("2").unwrap(), TaskId::positional(1));
        assert_eq!(parse_task_ref("task-3").unwrap(), TaskId::positional(2));
        assert!(parse_task_ref("0").is_err());
        assert!(parse_task_ref("banana").is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("select 2".parse::<Command>().unwrap(), Command::Select(TaskId::positional(1)));
        assert_eq!("gen".parse::<Command>().unwrap(), Command::Generate(None));
        assert_eq!("APPROVE task-1".parse::<Command>().unwrap(), Command::Approve(Some(TaskId::positional(0))));
        assert_eq!("x".parse::<Command>().unwrap(), Command::Execute);
    }

    #[test]
    fn test_edit_keeps_text_and_expands_newlines() {
        let command: Command = "edit Dear John,\\nSee you soon.".parse().unwrap();
        assert_eq!(command, Command::Edit("Dear John,\nSee you soon.".to_string()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<Command>(), Err(CommandError::Empty)));
        assert!(matches!("select".parse::<Command>(), Err(CommandError::MissingArgument { .. })));
        assert!(matches!("dance".parse::<Command>(), Err(CommandError::Unknown(_))));
    }
}
