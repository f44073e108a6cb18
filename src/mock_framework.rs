//! # Mock Framework
//!
//! Utilities for testing clients and the ledger in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers like
//! [`expect_get`] or [`expect_action`] to assert what the client sent.
//! [`StubRegistry`] stands in for the user registry behind the ledger.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest};
use crate::clients::ScoreLedger;
use crate::domain::{Address, User};
use crate::user_actor::UserError;

/// Creates a mock client and a receiver for asserting requests.
///
/// Instead of a running `ResourceActor`, requests land on a channel the test
/// controls, so it can answer with success, failure or nothing at all.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (events, _) = broadcast::channel(buffer_size);
    (ResourceClient::new(sender, events, Address::ZERO), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Address, T::CreateParams, oneshot::Sender<Result<T::Id, T::Error>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { caller, params, respond_to }) => Some((caller, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, T::Error>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Address, T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, T::Error>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { caller, id, action, respond_to }) => Some((caller, id, action, respond_to)),
        _ => None,
    }
}

/// In-memory registry with no access control, recording every debit.
#[derive(Default)]
pub struct StubRegistry {
    scores: Mutex<HashMap<u64, u64>>,
    debits: Mutex<Vec<(Address, u64, u64)>>,
}

impl StubRegistry {
    /// Registry holding `(id, score)` users.
    pub fn with_users(users: &[(u64, u64)]) -> Self {
        Self {
            scores: Mutex::new(users.iter().copied().collect()),
            debits: Mutex::default(),
        }
    }

    pub fn score_of(&self, id: u64) -> Option<u64> {
        self.scores.lock().unwrap().get(&id).copied()
    }

    /// Successful debits as `(caller, user_id, amount)`.
    pub fn debits(&self) -> Vec<(Address, u64, u64)> {
        self.debits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreLedger for StubRegistry {
    fn address(&self) -> Address {
        Address::new([5u8; 20])
    }

    async fn get_user(&self, id: u64) -> Result<User, UserError> {
        Ok(self
            .score_of(id)
            .map(|score| User::new(id, 0, score))
            .unwrap_or_default())
    }

    async fn debit_score(&self, caller: Address, id: u64, amount: u64) -> Result<User, UserError> {
        let mut scores = self.scores.lock().unwrap();
        let score = scores.get_mut(&id).ok_or(UserError::NotExists(id))?;
        if *score < amount {
            return Err(UserError::NotEnoughScore { id, score: *score, required: amount });
        }
        *score -= amount;
        self.debits.lock().unwrap().push((caller, id, amount));
        Ok(User::new(id, 0, *score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::UserClient;
    use crate::domain::UserCreate;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let client = UserClient::new(client);
        let caller = Address::new([1u8; 20]);

        let create_task = tokio::spawn(async move {
            client.create_user(caller, UserCreate::new(1, 18999999999, 0)).await
        });

        let (sent_by, params, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(sent_by, caller);
        assert_eq!(params.phone, 18999999999);
        responder.send(Ok(1)).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(1));
    }

    #[tokio::test]
    async fn stub_registry_rejects_overdraft() {
        let registry = StubRegistry::with_users(&[(1, 10)]);
        let result = registry.debit_score(Address::ZERO, 1, 11).await;
        assert_eq!(
            result,
            Err(UserError::NotEnoughScore { id: 1, score: 10, required: 11 })
        );
        assert!(registry.debits().is_empty());
    }
}
