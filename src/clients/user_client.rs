use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Address, User, UserCreate, UserUpdate};
use crate::user_actor::{UserAction, UserError};
use super::ScoreLedger;

/// Client for interacting with the user registry actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn create_user(&self, caller: Address, user: UserCreate) -> Result<u64, UserError> {
        debug!("Sending request");
        self.inner.create(caller, user).await
    }

    /// Overwrites phone and score of an existing user.
    #[instrument(skip(self))]
    pub async fn update_user(&self, caller: Address, id: u64, phone: u64, score: u64) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(caller, id, UserUpdate { phone, score }).await
    }

    /// Adds `amount` to the user's score.
    #[instrument(skip(self))]
    pub async fn charge_score(&self, caller: Address, id: u64, amount: u64) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner
            .perform_action(caller, id, UserAction::ChargeScore(amount))
            .await
    }

    #[instrument(skip(self))]
    pub async fn debit_score(&self, caller: Address, id: u64, amount: u64) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner
            .perform_action(caller, id, UserAction::DebitScore(amount))
            .await
    }

    /// Returns the stored user, or the zero-valued record when absent.
    pub async fn get_user(&self, id: u64) -> Result<User, UserError> {
        Ok(self.find_user(id).await?.unwrap_or_default())
    }

    pub async fn user_exists(&self, id: u64) -> Result<bool, UserError> {
        Ok(self.find_user(id).await?.is_some())
    }
}

#[async_trait]
impl ScoreLedger for UserClient {
    fn address(&self) -> Address {
        UserClient::address(self)
    }

    async fn get_user(&self, id: u64) -> Result<User, UserError> {
        UserClient::get_user(self, id).await
    }

    async fn user_exists(&self, id: u64) -> Result<bool, UserError> {
        UserClient::user_exists(self, id).await
    }

    async fn debit_score(&self, caller: Address, id: u64, amount: u64) -> Result<User, UserError> {
        UserClient::debit_score(self, caller, id, amount).await
    }
}
