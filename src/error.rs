//! Error types.

use crate::types::address::AddressError;
use crate::types::enums::{Action, Entity};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Referenced application, event or node does not exist.
    #[error("{0} not found")]
    NotFound(Entity),
    /// Caller already replied to / voted on this event.
    #[error("already {0}")]
    AlreadyDone(Action),
    /// Operation is not allowed in the event's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Malformed command arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Snapshot or journal bytes could not be decoded.
    #[error("corrupted data: {0}")]
    Corrupted(String),
}

impl From<AddressError> for ControllerError {
    fn from(e: AddressError) -> Self {
        ControllerError::InvalidInput(e.to_string())
    }
}

pub type ControllerResult<T> = core::result::Result<T, ControllerError>;
pub type Result<T> = ControllerResult<T>;
