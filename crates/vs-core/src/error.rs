//! Errors produced while sending a command to a device

use thiserror::Error;

use crate::response::DeviceResponse;

/// Result of a single device command
pub type CommandResult = Result<DeviceResponse, CommandError>;

/// Ways a device command can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The HTTP request could not be formed (bad address, bad header)
    #[error("Could not form request: {0}")]
    RequestBuild(String),

    /// Connection failure or timeout while sending
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    /// The device answered without a successful `API.STATUS`
    #[error("Device reported failure: {body}")]
    Protocol {
        /// Raw response body, kept for diagnostics
        body: String,
    },
}

impl CommandError {
    /// Short machine-readable name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::RequestBuild(_) => "request_build",
            CommandError::Transport(_) => "transport",
            CommandError::BodyRead(_) => "body_read",
            CommandError::Protocol { .. } => "protocol",
        }
    }
}
