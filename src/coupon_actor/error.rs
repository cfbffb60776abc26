use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponError {
    #[error("Coupon not found: {0}")]
    NotFound(String),
    #[error("Coupon already exists: {0}")]
    AlreadyExists(String),
    #[error("Coupon {0} is inactive")]
    Inactive(String),
    #[error("Coupon {0} is outside its validity window")]
    OutsideWindow(String),
    #[error("Coupon {0} has no uses left")]
    Exhausted(String),
    #[error("Coupon {code} requires a minimum purchase of {minimum:.2}")]
    BelowMinimum { code: String, minimum: f64 },
    #[error("Coupon validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<CouponError>> for CouponError {
    fn from(err: FrameworkError<CouponError>) -> Self {
        match err {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Duplicate(key) => Self::AlreadyExists(key),
            FrameworkError::Domain(err) => err,
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
