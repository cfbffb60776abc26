//! Order-specific domain logic: the status state machine, payment linkage and
//! fee rate bookkeeping.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
