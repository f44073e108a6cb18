use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, instrument};

use crate::actor_framework::FrameworkError;
use crate::domain::{Address, Order, OrderCreate, Role};
use crate::events::OrderEvent;
use crate::order_actor::{OrderError, OrderRequest};
use super::ScoreLedger;

/// Client for interacting with the order ledger actor.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
    events: broadcast::Sender<OrderEvent>,
    address: Address,
}

impl OrderClient {
    pub fn new(
        sender: mpsc::Sender<OrderRequest>,
        events: broadcast::Sender<OrderEvent>,
        address: Address,
    ) -> Self {
        Self { sender, events, address }
    }

    /// The ledger's own address; grant it `MANAGER` on the registry.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.events.subscribe()
    }

    /// Binds the ledger to a user registry. Only the first call succeeds.
    #[instrument(skip_all, fields(registry = %registry.address()))]
    pub async fn initialize(&self, registry: Arc<dyn ScoreLedger>) -> Result<(), OrderError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OrderRequest::Initialize { registry, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Returns the stored order, or the zero-valued record when absent.
    pub async fn get_order(&self, id: u64) -> Result<Order, OrderError> {
        Ok(self.find_order(id).await?.unwrap_or_default())
    }
}

client_method!(OrderClient => fn create_order(caller: Address, order: OrderCreate) -> u64 as OrderRequest::CreateOrder, Error = OrderError);
client_method!(OrderClient => fn pay_order(caller: Address, id: u64, amount: u64) -> Order as OrderRequest::PayOrder, Error = OrderError);
client_method!(OrderClient => fn find_order(id: u64) -> Option<Order> as OrderRequest::GetOrder, Error = OrderError);
client_method!(OrderClient => fn current_id() -> u64 as OrderRequest::CurrentId, Error = OrderError);
client_method!(OrderClient => fn grant_role(sender: Address, role: Role, account: Address) -> () as OrderRequest::GrantRole, Error = OrderError);
client_method!(OrderClient => fn revoke_role(sender: Address, role: Role, account: Address) -> () as OrderRequest::RevokeRole, Error = OrderError);
client_method!(OrderClient => fn renounce_role(sender: Address, role: Role, account: Address) -> () as OrderRequest::RenounceRole, Error = OrderError);
client_method!(OrderClient => fn has_role(role: Role, account: Address) -> bool as OrderRequest::HasRole, Error = OrderError);
client_method!(OrderClient => fn events() -> Vec<OrderEvent> as OrderRequest::Events, Error = OrderError);
