use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::access_control::{AccessControl, AccessError};
use crate::clients::{OrderClient, ScoreLedger};
use crate::domain::{Address, Order, OrderCreate, Role};
use crate::events::{EventJournal, OrderEvent, RoleEvent};
use crate::user_actor::UserError;
use super::{OrderError, OrderRequest};

/// Order ledger actor.
///
/// Root actor: it coordinates with the user registry
/// through the [`ScoreLedger`] bound by `Initialize`. A request, including any
/// awaited registry call, completes before the next one is read, so payment
/// is atomic with respect to every other ledger operation.
pub struct LedgerService {
    receiver: mpsc::Receiver<OrderRequest>,
    address: Address,
    registry: Option<Arc<dyn ScoreLedger>>,
    orders: HashMap<u64, Order>,
    next_id: u64,
    access: AccessControl,
    journal: EventJournal<OrderEvent>,
}

impl LedgerService {
    /// # Arguments
    /// * `buffer_size` - Request queue capacity
    /// * `address` - The ledger's own address, used as caller towards the registry
    /// * `deployer` - Receives `DEFAULT_ADMIN` and `MANAGER` on the ledger
    pub fn new(buffer_size: usize, address: Address, deployer: Address) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let journal = EventJournal::new(buffer_size);
        let client = OrderClient::new(sender, journal.sender(), address);
        let service = Self {
            receiver,
            address,
            registry: None,
            orders: HashMap::new(),
            next_id: 1,
            access: AccessControl::with_deployer(deployer),
            journal,
        };
        (service, client)
    }

    #[instrument(name = "order_ledger", skip(self), fields(address = %self.address))]
    pub async fn run(mut self) {
        info!("OrderLedger starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::Initialize { registry, respond_to } => {
                    let _ = respond_to.send(self.handle_initialize(registry));
                }
                OrderRequest::CreateOrder { caller, order, respond_to } => {
                    let result = self.handle_create_order(caller, order).await;
                    let _ = respond_to.send(result);
                }
                OrderRequest::GetOrder { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_get_order(id)));
                }
                OrderRequest::CurrentId { respond_to } => {
                    let _ = respond_to.send(Ok(self.next_id));
                }
                OrderRequest::PayOrder { caller, id, amount, respond_to } => {
                    let result = self.handle_pay_order(caller, id, amount).await;
                    let _ = respond_to.send(result);
                }
                OrderRequest::GrantRole { sender, role, account, respond_to } => {
                    let result = self.access.grant_role(sender, role, account);
                    let _ = respond_to.send(self.commit_role_change(result));
                }
                OrderRequest::RevokeRole { sender, role, account, respond_to } => {
                    let result = self.access.revoke_role(sender, role, account);
                    let _ = respond_to.send(self.commit_role_change(result));
                }
                OrderRequest::RenounceRole { sender, role, account, respond_to } => {
                    let result = self.access.renounce_role(sender, role, account);
                    let _ = respond_to.send(self.commit_role_change(result));
                }
                OrderRequest::HasRole { role, account, respond_to } => {
                    let _ = respond_to.send(Ok(self.access.has_role(role, account)));
                }
                OrderRequest::Events { respond_to } => {
                    let _ = respond_to.send(Ok(self.journal.entries()));
                }
            }
        }
        info!("OrderLedger stopped");
    }

    /// One-time binding to the user registry. A second call is rejected, the
    /// first binding stays.
    #[instrument(skip_all, fields(registry = %registry.address()))]
    fn handle_initialize(&mut self, registry: Arc<dyn ScoreLedger>) -> Result<(), OrderError> {
        if self.registry.is_some() {
            warn!("Ledger already initialized");
            return Err(OrderError::AlreadyInitialized);
        }
        let address = registry.address();
        self.registry = Some(registry);
        self.journal.record(OrderEvent::Initialized { registry: address });
        info!("Ledger bound to user registry");
        Ok(())
    }

    fn registry(&self) -> Result<Arc<dyn ScoreLedger>, OrderError> {
        self.registry.clone().ok_or(OrderError::NotInitialized)
    }

    #[instrument(
        skip_all,
        fields(caller = %caller, order_id = order.order_id, user_id = order.user_id, fee = order.fee)
    )]
    async fn handle_create_order(&mut self, caller: Address, order: OrderCreate) -> Result<u64, OrderError> {
        info!("Processing create_order request");
        self.access.check_role(Role::manager(), caller)?;
        let registry = self.registry()?;

        // Step 1: Validate user
        match registry.user_exists(order.user_id).await {
            Ok(true) => debug!("User validation successful"),
            Ok(false) => {
                error!("User not found");
                return Err(UserError::NotExists(order.user_id).into());
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(e.into());
            }
        }

        // Step 2: Store order under the next sequential id
        let id = self.next_id;
        let order = Order::from_create(id, order);
        self.next_id += 1;
        self.journal.record(OrderEvent::OrderCreated(order.clone()));
        self.orders.insert(id, order);

        info!(id, "Order created successfully");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn handle_get_order(&self, id: u64) -> Option<Order> {
        let order = self.orders.get(&id).cloned();
        match &order {
            Some(order) => debug!(is_payed = order.is_payed, "Order found"),
            None => debug!("Order not found"),
        }
        order
    }

    /// Settles an order by debiting its stored `fee` from the user.
    ///
    /// `amount` is accepted for call compatibility and only logged.
    #[instrument(skip(self, caller), fields(caller = %caller))]
    async fn handle_pay_order(&mut self, caller: Address, id: u64, amount: u64) -> Result<Order, OrderError> {
        info!("Processing pay_order request");
        self.access.check_role(Role::manager(), caller)?;
        let registry = self.registry()?;

        let mut payed = self.orders.get(&id).cloned().ok_or_else(|| {
            warn!("Order not found");
            OrderError::NotExists(id)
        })?;
        payed.mark_payed().map_err(|e| {
            warn!("Order already payed");
            e
        })?;
        if amount != payed.fee {
            debug!(fee = payed.fee, "Pay amount differs from order fee, debiting fee");
        }

        match registry.debit_score(self.address, payed.user_id, payed.fee).await {
            Ok(user) => info!(user_id = user.id, remaining = user.score, "Score debited"),
            Err(UserError::NotEnoughScore { score, required, .. }) => {
                warn!(score, required, "User cannot cover order fee");
                return Err(OrderError::UserNotEnoughScoreToPay {
                    order_id: id,
                    user_id: payed.user_id,
                });
            }
            Err(e) => {
                error!(error = %e, "Score debit failed");
                return Err(e.into());
            }
        }

        self.journal.record(OrderEvent::OrderPayed(payed.clone()));
        self.orders.insert(id, payed.clone());
        info!("Order payed successfully");
        Ok(payed)
    }

    fn commit_role_change(&mut self, result: Result<Option<RoleEvent>, AccessError>) -> Result<(), OrderError> {
        if let Some(event) = result? {
            self.journal.record(event);
        }
        Ok(())
    }
}
