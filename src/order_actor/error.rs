use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::OrderStatus;
use crate::pricing::PricingError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("Coupon rejected: {0}")]
    CouponRejected(String),
    #[error("Cannot {action} an order that is {from}")]
    InvalidTransition { from: OrderStatus, action: &'static str },
    #[error("Order {id} was changed concurrently: expected revision {expected}, found {actual}")]
    Conflict { id: String, expected: u64, actual: u64 },
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<OrderError>> for OrderError {
    fn from(err: FrameworkError<OrderError>) -> Self {
        match err {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Conflict { id, expected, actual } => Self::Conflict { id, expected, actual },
            FrameworkError::Domain(err) => err,
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
