//! Start/End status lines for commands

/// Phase of a command being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Start = 0,
    End = 1,
}

impl CommandStatus {
    /// Convert a raw phase value coming from outside the type system.
    ///
    /// # Panics
    ///
    /// Any value other than `0` (Start) or `1` (End) is a caller bug.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => CommandStatus::Start,
            1 => CommandStatus::End,
            other => panic!("Unsupported command status: {}", other),
        }
    }
}

/// Human-readable status line for `command` entering `status`.
pub fn command_status_string(command: &str, status: CommandStatus) -> String {
    match status {
        CommandStatus::Start => format!("Executing command: {}", command),
        CommandStatus::End => format!("Finished executing: {}", command),
    }
}
