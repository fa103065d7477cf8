use std::collections::HashSet;

use serde_json::Value;

use crate::types::{Cart, CartItem, UserId, Wishlist};

use super::{coerce_decimal, coerce_quantity, coerce_string, field, list, normalize_product};

/// Normalize a cart line.
#[must_use]
pub fn normalize_cart_item(value: &Value) -> CartItem {
    CartItem {
        product: normalize_product(field(value, "product")),
        quantity: coerce_quantity(field(value, "quantity")),
    }
}

/// Normalize a cart. Null or missing carts normalize to an empty cart.
#[must_use]
pub fn normalize_cart(value: &Value) -> Cart {
    Cart {
        user_id: UserId::from(coerce_string(field(value, "userId"))),
        items: list(field(value, "items"))
            .iter()
            .map(normalize_cart_item)
            .collect(),
        total: coerce_decimal(field(value, "total")),
    }
}

/// Normalize a wishlist.
///
/// Accepts either a bare product array or a `{ userId, products }` object.
/// Duplicate product ids are dropped, keeping the first occurrence.
#[must_use]
pub fn normalize_wishlist(value: &Value) -> Wishlist {
    let (user_id, products) = if value.is_array() {
        (UserId::default(), value)
    } else {
        (
            UserId::from(coerce_string(field(value, "userId"))),
            field(value, "products"),
        )
    };

    let mut seen = HashSet::new();
    let products = list(products)
        .iter()
        .map(normalize_product)
        .filter(|p| seen.insert(p.id.clone()))
        .collect();

    Wishlist { user_id, products }
}
