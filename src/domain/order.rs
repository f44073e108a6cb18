use serde::{Deserialize, Serialize};

use crate::order_actor::OrderError;

/// Kind of service an order bills for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderType {
    #[default]
    Highway = 0,
    Charge = 1,
    Park = 2,
}

impl TryFrom<u8> for OrderType {
    type Error = OrderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderType::Highway),
            1 => Ok(OrderType::Charge),
            2 => Ok(OrderType::Park),
            other => Err(OrderError::InvalidOrderType(other)),
        }
    }
}

/// A billable order held by the ledger.
///
/// `id` is assigned by the ledger; `order_id` and `order_sn` are the
/// caller's own references and are stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub order_id: u64,
    pub order_sn: String,
    pub order_type: OrderType,
    pub start_at: u64,
    pub end_at: u64,
    pub user_id: u64,
    pub fee: u64,
    pub unite_count: u64,
    pub is_payed: bool,
    pub start_position: String,
    pub end_position: String,
}

/// Payload for creating a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_id: u64,
    pub order_sn: String,
    pub order_type: OrderType,
    pub start_at: u64,
    pub end_at: u64,
    pub user_id: u64,
    pub fee: u64,
    pub unite_count: u64,
    /// Ignored: orders always start unpaid.
    pub is_payed: bool,
    pub start_position: String,
    pub end_position: String,
}

impl Order {
    /// Builds the stored order from its creation payload.
    ///
    /// # Notes
    /// `is_payed` from the payload is discarded; a new order is always unpaid.
    pub fn from_create(id: u64, params: OrderCreate) -> Self {
        Self {
            id,
            order_id: params.order_id,
            order_sn: params.order_sn,
            order_type: params.order_type,
            start_at: params.start_at,
            end_at: params.end_at,
            user_id: params.user_id,
            fee: params.fee,
            unite_count: params.unite_count,
            is_payed: false,
            start_position: params.start_position,
            end_position: params.end_position,
        }
    }

    /// Moves the order from `Created` to `Paid`.
    ///
    /// # Errors
    /// `AlreadyPayed` if the order was paid before; the transition happens once.
    pub fn mark_payed(&mut self) -> Result<(), OrderError> {
        if self.is_payed {
            return Err(OrderError::AlreadyPayed(self.id));
        }
        self.is_payed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highway_order() -> OrderCreate {
        OrderCreate {
            order_id: 7,
            order_sn: "sn-7".to_string(),
            order_type: OrderType::Highway,
            start_at: 1_700_377_074,
            end_at: 1_700_378_074,
            user_id: 1,
            fee: 1000,
            unite_count: 100,
            is_payed: true,
            start_position: "A".to_string(),
            end_position: "B".to_string(),
        }
    }

    #[test]
    fn new_orders_start_unpaid() {
        let order = Order::from_create(3, highway_order());
        assert_eq!(order.id, 3);
        assert_eq!(order.order_id, 7);
        assert!(!order.is_payed);
    }

    #[test]
    fn mark_payed_only_once() {
        let mut order = Order::from_create(1, highway_order());
        assert!(order.mark_payed().is_ok());
        assert!(order.is_payed);
        assert_eq!(order.mark_payed(), Err(OrderError::AlreadyPayed(1)));
    }

    #[test]
    fn order_type_from_discriminant() {
        assert_eq!(OrderType::try_from(2), Ok(OrderType::Park));
        assert_eq!(OrderType::try_from(9), Err(OrderError::InvalidOrderType(9)));
    }
}
