//! Error types for dispatched device requests

use thiserror::Error;
use vs_core::CommandError;

/// Result type alias for dispatched requests
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors seen by a caller of [`crate::DispatcherHandle::submit`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The dispatcher is no longer accepting requests
    #[error("Dispatcher is closed")]
    Closed,

    /// The reply slot was dropped without an answer
    #[error("Dispatcher dropped the request without replying")]
    Abandoned,

    /// The caller gave up waiting for the reply
    #[error("Timed out waiting for device reply")]
    Timeout,

    /// The device command itself failed
    #[error(transparent)]
    Command(#[from] CommandError),
}
