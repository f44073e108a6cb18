use serde::{Deserialize, Serialize};

/// A registered user and their score balance.
///
/// The zero-valued record (`id == 0`) stands for "no such user"; a stored
/// user always has a positive id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub phone: u64,
    pub score: u64,
}

/// Payload for creating a new user. The id is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub id: u64,
    pub phone: u64,
    pub score: u64,
}

/// Payload for updating an existing user. Both fields are overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub phone: u64,
    pub score: u64,
}

impl User {
    /// Creates a new User instance.
    ///
    /// # Arguments
    /// * `id` - Caller-assigned identifier, must be positive to be stored
    /// * `phone` - Contact number
    /// * `score` - Initial score balance
    pub fn new(id: u64, phone: u64, score: u64) -> Self {
        Self { id, phone, score }
    }

    /// Whether this record refers to a stored user.
    pub fn exists(&self) -> bool {
        self.id != 0
    }
}

impl UserCreate {
    pub fn new(id: u64, phone: u64, score: u64) -> Self {
        Self { id, phone, score }
    }
}
