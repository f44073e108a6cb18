//! Order indexer fed by the ledger's event stream.
//!
//! The ledger only looks orders up by id. Anything keyed on other attributes,
//! such as the orders of one user, is projected here from `OrderCreated` and
//! `OrderPayed` events, either replayed from the journal or received live.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::Order;
use crate::events::OrderEvent;

#[derive(Debug, Default)]
pub struct OrderIndexer {
    orders: BTreeMap<u64, Order>,
    by_user: BTreeMap<u64, BTreeSet<u64>>,
}

impl OrderIndexer {
    /// Builds an index by replaying journal entries in order.
    pub fn backfill<'a>(events: impl IntoIterator<Item = &'a OrderEvent>) -> Self {
        let mut indexer = Self::default();
        for event in events {
            indexer.apply(event);
        }
        indexer
    }

    pub fn apply(&mut self, event: &OrderEvent) {
        match event {
            OrderEvent::OrderCreated(order) | OrderEvent::OrderPayed(order) => {
                debug!(id = order.id, user_id = order.user_id, is_payed = order.is_payed, "Indexing order");
                self.by_user.entry(order.user_id).or_default().insert(order.id);
                self.orders.insert(order.id, order.clone());
            }
            OrderEvent::Initialized { .. } | OrderEvent::Role(_) => {}
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders referencing `user_id`, by ascending ledger id.
    pub fn orders_for_user(&self, user_id: u64) -> Vec<Order> {
        self.by_user
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.orders.get(id).cloned())
            .collect()
    }

    pub fn unpaid_for_user(&self, user_id: u64) -> Vec<Order> {
        self.orders_for_user(user_id)
            .into_iter()
            .filter(|order| !order.is_payed)
            .collect()
    }

    /// Sum of fees of the user's unpaid orders.
    pub fn outstanding_fees(&self, user_id: u64) -> u64 {
        self.unpaid_for_user(user_id)
            .iter()
            .map(|order| order.fee)
            .fold(0u64, u64::saturating_add)
    }
}

/// Runs an indexer task on a live subscription until the ledger goes away.
///
/// Lagging behind the broadcast buffer drops events; replay the journal with
/// [`OrderIndexer::backfill`] when a complete view is required.
pub fn spawn_indexer(
    mut events: broadcast::Receiver<OrderEvent>,
) -> (Arc<RwLock<OrderIndexer>>, JoinHandle<()>) {
    let index = Arc::new(RwLock::new(OrderIndexer::default()));
    let shared = index.clone();
    let handle = tokio::spawn(async move {
        info!("Order indexer starting");
        loop {
            match events.recv().await {
                Ok(event) => shared.write().await.apply(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Order indexer lagged behind the ledger");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("Order indexer stopped");
    });
    (index, handle)
}
