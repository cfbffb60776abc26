//! System orchestration, startup, and shutdown logic.

pub mod backoffice_system;
pub mod error;
pub mod tracing;

pub use backoffice_system::*;
pub use error::*;
pub use self::tracing::*;
