//! Catalog entities: products, categories, images and reviews.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId, ReviewId, UserId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Product image metadata as served by the media backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Absolute URL or a path relative to the image CDN.
    pub url: String,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub updated_at: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category: Option<Category>,
    pub image: Option<ProductImage>,
}

impl Product {
    /// Whether the product belongs to `category`.
    #[must_use]
    pub fn in_category(&self, category: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category)
    }
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Star rating, clamped to `0..=5`.
    pub rating: u8,
    pub review_text: Option<String>,
    pub created_at: String,
}

/// Product detail screen payload.
///
/// `product` is `None` when the server does not know the requested id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Option<Product>,
    pub reviews: Vec<Review>,
}

impl ProductDetail {
    /// Mean rating across all reviews, if any.
    #[must_use]
    pub fn average_rating(&self) -> Option<Decimal> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(Decimal::from(sum) / Decimal::from(self.reviews.len()))
    }
}
