//! Cart and wishlist entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::{ProductId, UserId};
use super::money::{line_total, saturating_sum};

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line (`price * quantity`).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        line_total(self.product.price, self.quantity)
    }
}

/// A user's cart.
///
/// `total` is computed by the server. Local optimistic edits recompute it
/// with [`Cart::computed_total`]; nothing enforces equality on every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl Cart {
    /// An empty cart owned by `user_id`.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        sum_items(&self.items)
    }

    /// Replace `total` with the locally computed sum.
    pub fn recompute_total(&mut self) {
        self.total = self.computed_total();
    }

    /// Find the line for `product_id`.
    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }
}

/// Sum `price * quantity` over `items`, saturating instead of overflowing.
#[must_use]
pub fn sum_items(items: &[CartItem]) -> Decimal {
    saturating_sum(items.iter().map(CartItem::subtotal))
}

/// A user's wishlist. Products are unique by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub user_id: UserId,
    pub products: Vec<Product>,
}

impl Wishlist {
    /// Whether `product_id` is on the list.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.iter().any(|p| &p.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::from(id),
            price: Decimal::new(cents, 2),
            ..Product::default()
        }
    }

    #[test]
    fn test_recompute_total() {
        let mut cart = Cart {
            user_id: UserId::from("u1"),
            items: vec![
                CartItem {
                    product: product("a", 34999),
                    quantity: 1,
                },
                CartItem {
                    product: product("b", 12999),
                    quantity: 2,
                },
            ],
            total: Decimal::ZERO,
        };
        cart.recompute_total();
        assert_eq!(cart.total, Decimal::new(60997, 2));
        assert_eq!(cart.item_count(), 3);
        assert!(cart.item(&ProductId::from("b")).is_some());
    }

    #[test]
    fn test_total_saturates_on_huge_prices() {
        let huge = Product {
            id: ProductId::from("a"),
            price: Decimal::MAX,
            ..Product::default()
        };
        let items = vec![
            CartItem {
                product: huge,
                quantity: 2,
            },
            CartItem {
                product: product("b", 100),
                quantity: 1,
            },
        ];
        assert_eq!(sum_items(&items), Decimal::MAX);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::empty(UserId::from("u1"));
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, Decimal::ZERO);
        assert_eq!(cart.computed_total(), Decimal::ZERO);
    }
}
