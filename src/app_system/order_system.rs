use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::clients::{OrderClient, UserClient};
use crate::domain::{Role, User, UserCreate};
use crate::order_actor::LedgerService;
use super::{SystemConfig, SystemError};

/// The main application system that deploys and links both components.
///
/// Deployment mirrors the two-step sequence the ledger depends on: bind the
/// ledger to the registry with `Initialize`, then grant the ledger's address
/// the registry's `MANAGER` role so it may debit scores.
pub struct OrderSystem {
    pub user_client: UserClient,
    pub order_client: OrderClient,
    pub config: SystemConfig,
    user_handle: JoinHandle<()>,
    order_handle: JoinHandle<()>,
}

impl OrderSystem {
    pub async fn new(config: SystemConfig) -> Result<Self, SystemError> {
        config.validate()?;
        info!(deployer = %config.deployer, "Deploying order system");

        // 1. User registry, keyed by caller-assigned ids
        let (user_actor, user_resource_client) = ResourceActor::<User>::new(
            config.buffer_size,
            config.registry_address,
            config.deployer,
            |params: &UserCreate| params.id,
        );
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        // 2. Order ledger
        let (ledger, order_client) =
            LedgerService::new(config.buffer_size, config.ledger_address, config.deployer);
        let order_handle = tokio::spawn(ledger.run());

        // 3. Link: initialize, then let the ledger debit scores
        order_client.initialize(Arc::new(user_client.clone())).await?;
        user_client
            .grant_role(config.deployer, Role::manager(), order_client.address())
            .await?;

        info!(
            registry = %config.registry_address,
            ledger = %config.ledger_address,
            "Order system deployed"
        );

        Ok(Self {
            user_client,
            order_client,
            config,
            user_handle,
            order_handle,
        })
    }

    /// Stops both actors. The ledger goes first because it holds a registry
    /// client; the registry only stops once that client is gone.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.order_client);
        Self::join("order_ledger", self.order_handle).await?;

        drop(self.user_client);
        Self::join("user_registry", self.user_handle).await?;

        info!("System shutdown complete.");
        Ok(())
    }

    async fn join(name: &str, handle: JoinHandle<()>) -> Result<(), SystemError> {
        handle.await.map_err(|e| {
            error!(actor = name, "Actor task failed: {:?}", e);
            SystemError::TaskFailed(format!("{name}: {e}"))
        })
    }
}
