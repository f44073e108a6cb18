mod access_control;
mod actor_framework;
mod app_system;
mod clients;
mod domain;
mod events;
mod indexer;
mod order_actor;
mod user_actor;

#[cfg(test)]
mod mock_framework;

use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, OrderSystem, SystemConfig};
use crate::domain::{OrderCreate, OrderType, UserCreate};
use crate::indexer::spawn_indexer;

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = SystemConfig::from_env().map_err(|e| e.to_string())?;
    let system = OrderSystem::new(config).await.map_err(|e| e.to_string())?;
    let deployer = system.config.deployer;
    let (index, indexer_handle) = spawn_indexer(system.order_client.subscribe());

    let span = tracing::info_span!("user_creation");
    let user_id = async {
        info!("Creating test user");
        system
            .user_client
            .create_user(deployer, UserCreate::new(1, 18888888888, 0))
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(user_id, "User created successfully");

    let order = OrderCreate {
        order_id: 1,
        order_sn: "testxxxx".to_string(),
        order_type: OrderType::Highway,
        start_at: 1_700_377_074,
        end_at: 1_700_378_074,
        user_id,
        fee: 1000,
        unite_count: 100,
        is_payed: false,
        start_position: "Highway A".to_string(),
        end_position: "Highway B".to_string(),
    };

    let span = tracing::info_span!("order_processing");
    let order_result = async {
        let id = system
            .order_client
            .create_order(deployer, order)
            .await
            .map_err(|e| e.to_string())?;

        // Not enough score yet; the ledger reports it and leaves the order unpaid
        if let Err(e) = system.order_client.pay_order(deployer, id, 1).await {
            info!(error = %e, "Payment rejected");
        }

        system
            .user_client
            .charge_score(deployer, user_id, 1000)
            .await
            .map_err(|e| e.to_string())?;
        system
            .order_client
            .pay_order(deployer, id, 1)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await;

    match order_result {
        Ok(order) => info!(order_id = order.id, is_payed = order.is_payed, "Order processed successfully"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    let user = system
        .user_client
        .get_user(user_id)
        .await
        .map_err(|e| e.to_string())?;
    info!(user_id, score = user.score, "Final user state");

    // Shutdown system gracefully
    system.shutdown().await.map_err(|e| e.to_string())?;
    indexer_handle.await.map_err(|e| e.to_string())?;
    info!(
        outstanding = index.read().await.outstanding_fees(user_id),
        "Indexer drained"
    );

    info!("Application completed successfully");
    Ok(())
}
