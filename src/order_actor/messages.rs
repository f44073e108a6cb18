use std::sync::Arc;

use tokio::sync::oneshot;

use crate::clients::ScoreLedger;
use crate::domain::{Address, Order, OrderCreate, Role};
use crate::events::OrderEvent;
use super::OrderError;

pub type ServiceResponse<T> = oneshot::Sender<Result<T, OrderError>>;

/// Typed messages for the ledger actor. Each variant carries its parameters
/// and a oneshot channel for the response.
pub enum OrderRequest {
    Initialize {
        registry: Arc<dyn ScoreLedger>,
        respond_to: ServiceResponse<()>,
    },
    CreateOrder {
        caller: Address,
        order: OrderCreate,
        respond_to: ServiceResponse<u64>,
    },
    GetOrder {
        id: u64,
        respond_to: ServiceResponse<Option<Order>>,
    },
    CurrentId {
        respond_to: ServiceResponse<u64>,
    },
    PayOrder {
        caller: Address,
        id: u64,
        amount: u64,
        respond_to: ServiceResponse<Order>,
    },
    GrantRole {
        sender: Address,
        role: Role,
        account: Address,
        respond_to: ServiceResponse<()>,
    },
    RevokeRole {
        sender: Address,
        role: Role,
        account: Address,
        respond_to: ServiceResponse<()>,
    },
    RenounceRole {
        sender: Address,
        role: Role,
        account: Address,
        respond_to: ServiceResponse<()>,
    },
    HasRole {
        role: Role,
        account: Address,
        respond_to: ServiceResponse<bool>,
    },
    Events {
        respond_to: ServiceResponse<Vec<OrderEvent>>,
    },
}
