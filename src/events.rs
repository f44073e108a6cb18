//! Events emitted by the registry and the ledger after each committed mutation.
//!
//! Every component keeps an append-only journal and fans events out to live
//! subscribers. Nothing is recorded for a failed operation.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::{Address, Order, Role, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum RoleEvent {
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum UserEvent {
    UserCreated(User),
    UserUpdated(User),
    ScoreCharged { id: u64, amount: u64, score: u64 },
    ScoreDebited { id: u64, amount: u64, score: u64 },
    Role(RoleEvent),
}

impl From<RoleEvent> for UserEvent {
    fn from(event: RoleEvent) -> Self {
        UserEvent::Role(event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum OrderEvent {
    Initialized { registry: Address },
    OrderCreated(Order),
    OrderPayed(Order),
    Role(RoleEvent),
}

impl From<RoleEvent> for OrderEvent {
    fn from(event: RoleEvent) -> Self {
        OrderEvent::Role(event)
    }
}

/// Append-only event log with live fan-out.
pub struct EventJournal<E: Clone> {
    log: Vec<E>,
    live: broadcast::Sender<E>,
}

impl<E: Clone> EventJournal<E> {
    pub fn new(capacity: usize) -> Self {
        let (live, _) = broadcast::channel(capacity.max(1));
        Self {
            log: Vec::new(),
            live,
        }
    }

    /// Appends a committed event and forwards it to any subscribers.
    pub fn record(&mut self, event: impl Into<E>) {
        let event = event.into();
        self.log.push(event.clone());
        // No subscribers is fine; the journal still holds the event.
        let _ = self.live.send(event);
    }

    pub fn entries(&self) -> Vec<E> {
        self.log.clone()
    }

    /// Handle clients keep so they can subscribe without a round trip.
    pub fn sender(&self) -> broadcast::Sender<E> {
        self.live.clone()
    }
}
