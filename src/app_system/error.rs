use thiserror::Error;

use crate::order_actor::OrderError;
use crate::user_actor::UserError;
use super::ConfigError;

/// Failures while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("User registry setup failed: {0}")]
    Registry(#[from] UserError),
    #[error("Order ledger setup failed: {0}")]
    Ledger(#[from] OrderError),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
