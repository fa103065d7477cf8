//! Orders and payments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, PaymentId, ProductId, UserId};
use super::money::line_total;

/// Price snapshot of one product inside an order.
///
/// Decoupled from the live [`Product`](super::Product): later catalog price
/// changes do not affect placed orders. The same shape is sent as
/// `OrderProductInput` when creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductSummary {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl OrderProductSummary {
    /// Line total of the snapshot.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }
}

/// A placed order. `status` is free-form and owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub products: Vec<OrderProductSummary>,
}

/// A payment recorded against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Payment method / provider name (e.g. `card`).
    pub method: String,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
