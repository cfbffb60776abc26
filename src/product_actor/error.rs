use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::pricing::PricingError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u32 },
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<ProductError>> for ProductError {
    fn from(err: FrameworkError<ProductError>) -> Self {
        match err {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Domain(err) => err,
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
