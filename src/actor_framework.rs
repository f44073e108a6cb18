use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::access_control::{AccessControl, AccessError};
use crate::domain::{Address, Role};
use crate::events::{EventJournal, RoleEvent};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, Actions and Events)
// =============================================================================

/// Channel failures between a client and its actor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Event: Clone + Send + Sync + Debug + From<RoleEvent> + 'static;
    type Error: std::error::Error
        + Send
        + Sync
        + From<AccessError>
        + From<FrameworkError>
        + 'static;

    /// Role a caller must hold to create, update or act on entities.
    fn write_role() -> Role {
        Role::manager()
    }

    /// Construct the full Entity from the ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    fn already_exists(id: &Self::Id) -> Self::Error;
    fn not_found(id: &Self::Id) -> Self::Error;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;

    fn created_event(&self) -> Self::Event;
    fn updated_event(&self) -> Self::Event;

    // --- Action Handler ---

    /// Handle a custom domain-specific action, returning its result and the
    /// event to record once the change is committed.
    fn handle_action(
        &mut self,
        action: Self::Action,
    ) -> Result<(Self::ActionResult, Self::Event), Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        caller: Address,
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    Update {
        caller: Address,
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Action {
        caller: Address,
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    GrantRole {
        sender: Address,
        role: Role,
        account: Address,
        respond_to: Response<(), T::Error>,
    },
    RevokeRole {
        sender: Address,
        role: Role,
        account: Address,
        respond_to: Response<(), T::Error>,
    },
    RenounceRole {
        sender: Address,
        role: Role,
        account: Address,
        respond_to: Response<(), T::Error>,
    },
    HasRole {
        role: Role,
        account: Address,
        respond_to: Response<bool, T::Error>,
    },
    Events {
        respond_to: Response<Vec<T::Event>, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns a keyed store of entities and applies requests one at a time.
///
/// Every mutation works on a copy of the stored entity and is committed only
/// when all hooks succeed, so a failed request leaves no trace in the store
/// or the journal.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    address: Address,
    store: HashMap<T::Id, T>,
    access: AccessControl,
    journal: EventJournal<T::Event>,
    next_id_fn: Box<dyn Fn(&T::CreateParams) -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    /// # Arguments
    /// * `buffer_size` - Request queue capacity
    /// * `address` - Address of the component this actor backs
    /// * `deployer` - Receives `DEFAULT_ADMIN` and `MANAGER`
    /// * `next_id_fn` - Derives the id of an entity about to be created
    pub fn new(
        buffer_size: usize,
        address: Address,
        deployer: Address,
        next_id_fn: impl Fn(&T::CreateParams) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let journal = EventJournal::new(buffer_size);
        let client = ResourceClient {
            sender,
            events: journal.sender(),
            address,
        };
        let actor = Self {
            receiver,
            address,
            store: HashMap::new(),
            access: AccessControl::with_deployer(deployer),
            journal,
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, client)
    }

    pub async fn run(mut self) {
        info!(address = %self.address, "ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { caller, params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(caller, params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::Update { caller, id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(caller, id, patch));
                }
                ResourceRequest::Action { caller, id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(caller, id, action));
                }
                ResourceRequest::GrantRole { sender, role, account, respond_to } => {
                    let result = self.access.grant_role(sender, role, account);
                    let _ = respond_to.send(self.commit_role_change(result));
                }
                ResourceRequest::RevokeRole { sender, role, account, respond_to } => {
                    let result = self.access.revoke_role(sender, role, account);
                    let _ = respond_to.send(self.commit_role_change(result));
                }
                ResourceRequest::RenounceRole { sender, role, account, respond_to } => {
                    let result = self.access.renounce_role(sender, role, account);
                    let _ = respond_to.send(self.commit_role_change(result));
                }
                ResourceRequest::HasRole { role, account, respond_to } => {
                    let _ = respond_to.send(Ok(self.access.has_role(role, account)));
                }
                ResourceRequest::Events { respond_to } => {
                    let _ = respond_to.send(Ok(self.journal.entries()));
                }
            }
        }
        info!(address = %self.address, "ResourceActor stopped");
    }

    #[instrument(skip_all, fields(caller = %caller))]
    fn handle_create(&mut self, caller: Address, params: T::CreateParams) -> Result<T::Id, T::Error> {
        self.access.check_role(T::write_role(), caller)?;
        let id = (self.next_id_fn)(&params);
        let mut item = T::from_create_params(id.clone(), params)?;
        if self.store.contains_key(&id) {
            warn!(%id, "Entity already exists");
            return Err(T::already_exists(&id));
        }
        item.on_create()?;
        self.journal.record(item.created_event());
        self.store.insert(id.clone(), item);
        debug!(%id, "Entity created");
        Ok(id)
    }

    #[instrument(skip_all, fields(caller = %caller, id = %id))]
    fn handle_update(&mut self, caller: Address, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.access.check_role(T::write_role(), caller)?;
        let mut item = self.store.get(&id).cloned().ok_or_else(|| T::not_found(&id))?;
        item.on_update(patch)?;
        self.journal.record(item.updated_event());
        self.store.insert(id, item.clone());
        debug!("Entity updated");
        Ok(item)
    }

    #[instrument(skip_all, fields(caller = %caller, id = %id, action = ?action))]
    fn handle_action(
        &mut self,
        caller: Address,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, T::Error> {
        self.access.check_role(T::write_role(), caller)?;
        let mut item = self.store.get(&id).cloned().ok_or_else(|| T::not_found(&id))?;
        let (result, event) = item.handle_action(action)?;
        self.journal.record(event);
        self.store.insert(id, item);
        Ok(result)
    }

    fn commit_role_change(&mut self, result: Result<Option<RoleEvent>, AccessError>) -> Result<(), T::Error> {
        if let Some(event) = result? {
            self.journal.record(event);
        }
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    events: broadcast::Sender<T::Event>,
    address: Address,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(
        sender: mpsc::Sender<ResourceRequest<T>>,
        events: broadcast::Sender<T::Event>,
        address: Address,
    ) -> Self {
        Self { sender, events, address }
    }

    /// Address of the component behind this client.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T::Event> {
        self.events.subscribe()
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, caller: Address, params: T::CreateParams) -> Result<T::Id, T::Error> {
        self.request(|respond_to| ResourceRequest::Create { caller, params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn update(&self, caller: Address, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Update { caller, id, patch, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        caller: Address,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, T::Error> {
        self.request(|respond_to| ResourceRequest::Action { caller, id, action, respond_to })
            .await
    }

    pub async fn grant_role(&self, sender: Address, role: Role, account: Address) -> Result<(), T::Error> {
        self.request(|respond_to| ResourceRequest::GrantRole { sender, role, account, respond_to })
            .await
    }

    pub async fn revoke_role(&self, sender: Address, role: Role, account: Address) -> Result<(), T::Error> {
        self.request(|respond_to| ResourceRequest::RevokeRole { sender, role, account, respond_to })
            .await
    }

    pub async fn renounce_role(&self, sender: Address, role: Role, account: Address) -> Result<(), T::Error> {
        self.request(|respond_to| ResourceRequest::RenounceRole { sender, role, account, respond_to })
            .await
    }

    pub async fn has_role(&self, role: Role, account: Address) -> Result<bool, T::Error> {
        self.request(|respond_to| ResourceRequest::HasRole { role, account, respond_to })
            .await
    }

    pub async fn events(&self) -> Result<Vec<T::Event>, T::Error> {
        self.request(|respond_to| ResourceRequest::Events { respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        label: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
    }

    #[derive(Debug)]
    struct CounterPatch {
        label: String,
    }

    #[derive(Debug)]
    enum CounterAction {
        Increment,
        Decrement,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum CounterEvent {
        Created(String),
        Updated(String),
        Changed(u32),
        Role,
    }

    impl From<RoleEvent> for CounterEvent {
        fn from(_: RoleEvent) -> Self {
            CounterEvent::Role
        }
    }

    #[derive(Debug, Error)]
    enum CounterError {
        #[error("empty label")]
        EmptyLabel,
        #[error("counter exists: {0}")]
        Exists(String),
        #[error("counter missing: {0}")]
        Missing(String),
        #[error("underflow")]
        Underflow,
        #[error(transparent)]
        Access(#[from] AccessError),
        #[error(transparent)]
        Framework(#[from] FrameworkError),
    }

    impl Entity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type Patch = CounterPatch;
        type Action = CounterAction;
        type ActionResult = u32;
        type Event = CounterEvent;
        type Error = CounterError;

        fn from_create_params(id: String, params: CounterCreate) -> Result<Self, CounterError> {
            if params.label.is_empty() {
                return Err(CounterError::EmptyLabel);
            }
            Ok(Self { id, label: params.label, value: 0 })
        }

        fn already_exists(id: &String) -> CounterError {
            CounterError::Exists(id.clone())
        }

        fn not_found(id: &String) -> CounterError {
            CounterError::Missing(id.clone())
        }

        fn on_update(&mut self, patch: CounterPatch) -> Result<(), CounterError> {
            self.label = patch.label;
            Ok(())
        }

        fn created_event(&self) -> CounterEvent {
            CounterEvent::Created(self.id.clone())
        }

        fn updated_event(&self) -> CounterEvent {
            CounterEvent::Updated(self.label.clone())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<(u32, CounterEvent), CounterError> {
            match action {
                CounterAction::Increment => self.value += 1,
                CounterAction::Decrement => {
                    self.value = self.value.checked_sub(1).ok_or(CounterError::Underflow)?;
                }
            }
            Ok((self.value, CounterEvent::Changed(self.value)))
        }
    }

    fn deployer() -> Address {
        Address::new([1u8; 20])
    }

    fn outsider() -> Address {
        Address::new([2u8; 20])
    }

    fn spawn_counters() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move |_: &CounterCreate| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            format!("counter_{}", id)
        };
        let (actor, client) = ResourceActor::new(10, Address::ZERO, deployer(), next_id);
        tokio::spawn(actor.run());
        client
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_counters();

        let id = client
            .create(deployer(), CounterCreate { label: "hits".into() })
            .await
            .unwrap();
        assert_eq!(id, "counter_1");

        let value = client
            .perform_action(deployer(), id.clone(), CounterAction::Increment)
            .await
            .unwrap();
        assert_eq!(value, 1);

        let stored = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.value, 1);

        let events = client.events().await.unwrap();
        assert_eq!(
            events,
            vec![CounterEvent::Created(id), CounterEvent::Changed(1)]
        );
    }

    #[tokio::test]
    async fn failed_action_leaves_state_and_journal_untouched() {
        let client = spawn_counters();
        let id = client
            .create(deployer(), CounterCreate { label: "hits".into() })
            .await
            .unwrap();

        let result = client
            .perform_action(deployer(), id.clone(), CounterAction::Decrement)
            .await;
        assert!(matches!(result, Err(CounterError::Underflow)));

        assert_eq!(client.get(id.clone()).await.unwrap().unwrap().value, 0);
        assert_eq!(client.events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mutations_require_write_role() {
        let client = spawn_counters();

        let result = client
            .create(outsider(), CounterCreate { label: "hits".into() })
            .await;
        assert!(matches!(
            result,
            Err(CounterError::Access(AccessError::MissingRole { .. }))
        ));

        client
            .grant_role(deployer(), Role::manager(), outsider())
            .await
            .unwrap();
        assert!(client.has_role(Role::manager(), outsider()).await.unwrap());

        let id = client
            .create(outsider(), CounterCreate { label: "hits".into() })
            .await
            .unwrap();
        let updated = client
            .update(outsider(), id, CounterPatch { label: "visits".into() })
            .await
            .unwrap();
        assert_eq!(updated.label, "visits");
    }

    #[tokio::test]
    async fn missing_entity_reports_not_found() {
        let client = spawn_counters();
        let result = client
            .perform_action(deployer(), "counter_9".to_string(), CounterAction::Increment)
            .await;
        assert!(matches!(result, Err(CounterError::Missing(id)) if id == "counter_9"));
    }

    #[tokio::test]
    async fn closed_actor_reports_framework_error() {
        let (actor, client) =
            ResourceActor::<Counter>::new(1, Address::ZERO, deployer(), |_| "counter".to_string());
        drop(actor);
        let result = client.get("counter".to_string()).await;
        assert!(matches!(result, Err(CounterError::Framework(FrameworkError::ActorClosed))));
    }
}
