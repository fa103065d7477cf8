//! Wishlist slice.

use serde::{Deserialize, Serialize};
use shopx_core::{Product, ProductId};

/// Saved products, unique by id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WishlistState {
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    Set(Vec<Product>),
    /// Append unless already saved.
    Add(Product),
    Remove(ProductId),
    Clear,
}

impl WishlistState {
    pub(crate) fn apply(&mut self, action: WishlistAction) {
        match action {
            WishlistAction::Set(products) => {
                self.products.clear();
                for product in products {
                    self.insert(product);
                }
            }
            WishlistAction::Add(product) => self.insert(product),
            WishlistAction::Remove(product_id) => {
                self.products.retain(|p| p.id != product_id);
            }
            WishlistAction::Clear => *self = Self::default(),
        }
    }

    fn insert(&mut self, product: Product) {
        if !self.contains(&product.id) {
            self.products.push(product);
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.iter().any(|p| &p.id == product_id)
    }
}
