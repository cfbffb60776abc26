use thiserror::Error;

use crate::config::ConfigError;

/// Failures while starting or stopping the back office.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Actor task failed: {0}")]
    ActorTask(String),
}
