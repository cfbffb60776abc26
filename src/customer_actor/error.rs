use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(String),
    #[error("Customer already exists: {0}")]
    AlreadyExists(String),
    #[error("Customer validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<CustomerError>> for CustomerError {
    fn from(err: FrameworkError<CustomerError>) -> Self {
        match err {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Duplicate(key) => Self::AlreadyExists(key),
            FrameworkError::Domain(err) => err,
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
