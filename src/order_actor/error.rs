use thiserror::Error;

use crate::access_control::AccessError;
use crate::actor_framework::FrameworkError;
use crate::user_actor::UserError;

/// Errors that can occur during order ledger operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not exists: {0}")]
    NotExists(u64),
    #[error("Order already payed: {0}")]
    AlreadyPayed(u64),
    #[error("User {user_id} has not enough score to pay order {order_id}")]
    UserNotEnoughScoreToPay { order_id: u64, user_id: u64 },
    #[error("Invalid order type: {0}")]
    InvalidOrderType(u8),
    #[error("Order ledger already initialized")]
    AlreadyInitialized,
    #[error("Order ledger not initialized")]
    NotInitialized,
    /// Raised by the user registry and passed through unchanged.
    #[error(transparent)]
    Registry(#[from] UserError),
    #[error(transparent)]
    AccessDenied(#[from] AccessError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        OrderError::ActorCommunicationError(e.to_string())
    }
}
