//! Cart slice.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopx_core::{Cart, CartItem, ProductId, UserId, sum_items};

/// Local view of the signed-in user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// When the server last confirmed this cart.
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Replace with an authoritative cart.
    Set(Cart),
    /// Replace the line for the item's product, or append it.
    UpsertItem(CartItem),
    RemoveItem(ProductId),
    Clear,
}

impl CartState {
    pub(crate) fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Set(cart) => {
                self.user_id = cart.user_id;
                self.items = cart.items;
                self.total = cart.total;
                self.last_synced_at = Some(Utc::now());
            }
            CartAction::UpsertItem(item) => {
                match self
                    .items
                    .iter_mut()
                    .find(|line| line.product.id == item.product.id)
                {
                    Some(line) => *line = item,
                    None => self.items.push(item),
                }
                self.total = sum_items(&self.items);
            }
            CartAction::RemoveItem(product_id) => {
                self.items.retain(|line| line.product.id != product_id);
                self.total = sum_items(&self.items);
            }
            CartAction::Clear => *self = Self::default(),
        }
    }

    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|line| &line.product.id == product_id)
    }

    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.item(product_id).map_or(0, |line| line.quantity)
    }

    /// Snapshot as a domain cart.
    #[must_use]
    pub fn to_cart(&self) -> Cart {
        Cart {
            user_id: self.user_id.clone(),
            items: self.items.clone(),
            total: self.total,
        }
    }
}
