use thiserror::Error;

use crate::access_control::AccessError;
use crate::actor_framework::FrameworkError;

/// Errors that can occur during user registry operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User info params invalid: id must be positive")]
    InfoParamsInvalid,
    #[error("User already exists: {0}")]
    AlreadyExists(u64),
    #[error("User not exists: {0}")]
    NotExists(u64),
    #[error("User {id} has not enough score: {score} available, {required} required")]
    NotEnoughScore { id: u64, score: u64, required: u64 },
    #[error("Score overflow for user {0}")]
    ScoreOverflow(u64),
    #[error(transparent)]
    AccessDenied(#[from] AccessError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(e: FrameworkError) -> Self {
        UserError::ActorCommunicationError(e.to_string())
    }
}
