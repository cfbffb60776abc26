//! Coupon redemption rules: validity window, usage caps and minimum purchase.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
