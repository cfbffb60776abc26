//! Product-specific domain logic, including stock adjustments and price changes.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
