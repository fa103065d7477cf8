//! Orders slice. Never persisted.

use chrono::{DateTime, Utc};
use shopx_core::Order;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrdersState {
    pub orders: Vec<Order>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdersAction {
    Set(Vec<Order>),
    Clear,
}

impl OrdersState {
    pub(crate) fn apply(&mut self, action: OrdersAction) {
        match action {
            OrdersAction::Set(orders) => {
                self.orders = orders;
                self.last_updated_at = Some(Utc::now());
            }
            OrdersAction::Clear => *self = Self::default(),
        }
    }
}
