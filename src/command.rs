use crate::error::{Result, TreeSelectError};
use crate::tree::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents all possible user commands that can be executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Quit,

    // Cursor movement
    CursorUp,
    CursorDown,
    CursorFirst,
    CursorLast,

    // Tree commands
    PressCursor,
    Press(NodeId),
    ExpandCursor,
    CollapseCursor,

    // Search box
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    AcceptSearch,
    ClearSearch,

    // Multi-step commands for testing
    Sequence(Vec<Command>),
}

impl Command {
    /// Parse a command from a string representation
    pub fn from_string(s: &str) -> Result<Self> {
        if let Some(id) = s.strip_prefix("press:") {
            if id.is_empty() {
                return Err(TreeSelectError::Command("press: needs a node id".to_string()));
            }
            return Ok(Command::Press(NodeId::from_input(id)));
        }

        if let Some(char_str) = s.strip_prefix("search:") {
            if let Some(ch) = char_str.chars().next() {
                return Ok(Command::SearchInput(ch));
            }
            return Err(TreeSelectError::Command("search: needs a character".to_string()));
        }

        if let Some(inner) = s
            .strip_prefix("sequence:[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            // Parse sequence: sequence:[cmd1,cmd2,cmd3]
            if inner.is_empty() {
                return Ok(Command::Sequence(vec![]));
            }

            let mut commands = Vec::new();
            for cmd_str in inner.split(',') {
                let cmd_str = cmd_str.trim();
                match Command::from_string(cmd_str) {
                    Ok(cmd) => commands.push(cmd),
                    Err(e) => {
                        return Err(TreeSelectError::Command(format!(
                            "Invalid command in sequence '{}': {}",
                            cmd_str, e
                        )))
                    }
                }
            }
            return Ok(Command::Sequence(commands));
        }

        match s.to_lowercase().as_str() {
            "quit" | "q" => Ok(Command::Quit),

            "cursor_up" | "up" => Ok(Command::CursorUp),
            "cursor_down" | "down" => Ok(Command::CursorDown),
            "cursor_first" | "home" => Ok(Command::CursorFirst),
            "cursor_last" | "end" => Ok(Command::CursorLast),

            "press" | "enter" | "space" => Ok(Command::PressCursor),
            "expand" | "right" => Ok(Command::ExpandCursor),
            "collapse" | "left" => Ok(Command::CollapseCursor),

            "start_search" | "/" => Ok(Command::StartSearch),
            "search_backspace" | "backspace" => Ok(Command::SearchBackspace),
            "accept_search" => Ok(Command::AcceptSearch),
            "clear_search" | "escape" => Ok(Command::ClearSearch),

            _ => Err(TreeSelectError::Command(format!("Unknown command: {}", s))),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Quit => write!(f, "quit"),
            Command::CursorUp => write!(f, "cursor_up"),
            Command::CursorDown => write!(f, "cursor_down"),
            Command::CursorFirst => write!(f, "cursor_first"),
            Command::CursorLast => write!(f, "cursor_last"),
            Command::PressCursor => write!(f, "press"),
            Command::Press(id) => write!(f, "press:{}", id),
            Command::ExpandCursor => write!(f, "expand"),
            Command::CollapseCursor => write!(f, "collapse"),
            Command::StartSearch => write!(f, "start_search"),
            Command::SearchInput(ch) => write!(f, "search:{}", ch),
            Command::SearchBackspace => write!(f, "search_backspace"),
            Command::AcceptSearch => write!(f, "accept_search"),
            Command::ClearSearch => write!(f, "clear_search"),
            Command::Sequence(commands) => {
                let inner: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
                write!(f, "sequence:[{}]", inner.join(","))
            }
        }
    }
}
