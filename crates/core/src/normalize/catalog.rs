use serde_json::Value;

use crate::types::{
    Category, CategoryId, Product, ProductDetail, ProductId, ProductImage, Review, ReviewId,
    UserId,
};

use super::{
    coerce_decimal, coerce_optional_string, coerce_quantity, coerce_string, field, is_record,
    list,
};

/// Normalize a category record.
#[must_use]
pub fn normalize_category(value: &Value) -> Category {
    Category {
        id: CategoryId::from(coerce_string(field(value, "id"))),
        name: coerce_string(field(value, "name")),
        description: coerce_optional_string(field(value, "description")),
    }
}

/// Normalize a list of categories.
#[must_use]
pub fn normalize_categories(value: &Value) -> Vec<Category> {
    list(value).iter().map(normalize_category).collect()
}

/// Normalize an image relation. Non-objects yield `None`.
#[must_use]
pub fn normalize_image(value: &Value) -> Option<ProductImage> {
    is_record(value).then(|| ProductImage {
        url: coerce_string(field(value, "url")),
        filename: coerce_optional_string(field(value, "filename")),
        mime_type: coerce_optional_string(field(value, "mimeType")),
        updated_at: coerce_optional_string(field(value, "updatedAt")),
    })
}

/// Normalize a product record.
#[must_use]
pub fn normalize_product(value: &Value) -> Product {
    let category = field(value, "category");
    Product {
        id: ProductId::from(coerce_string(field(value, "id"))),
        name: coerce_string(field(value, "name")),
        price: coerce_decimal(field(value, "price")),
        description: coerce_optional_string(field(value, "description")),
        category_id: coerce_optional_string(field(value, "categoryId")).map(CategoryId::from),
        category: is_record(category).then(|| normalize_category(category)),
        image: normalize_image(field(value, "image")),
    }
}

/// Normalize a list of products, keeping server order.
#[must_use]
pub fn normalize_products(value: &Value) -> Vec<Product> {
    list(value).iter().map(normalize_product).collect()
}

/// Normalize a review record. Ratings are clamped to `0..=5`.
#[must_use]
pub fn normalize_review(value: &Value) -> Review {
    let rating = coerce_quantity(field(value, "rating")).min(5);
    Review {
        id: ReviewId::from(coerce_string(field(value, "id"))),
        product_id: ProductId::from(coerce_string(field(value, "productId"))),
        user_id: UserId::from(coerce_string(field(value, "userId"))),
        rating: u8::try_from(rating).unwrap_or(5),
        review_text: coerce_optional_string(field(value, "reviewText")),
        created_at: coerce_string(field(value, "createdAt")),
    }
}

/// Normalize a list of reviews.
#[must_use]
pub fn normalize_reviews(value: &Value) -> Vec<Review> {
    list(value).iter().map(normalize_review).collect()
}

/// Normalize the product detail payload (`product` + `reviews` roots).
///
/// Reviews that omit `productId` inherit the product's id, since the detail
/// query does not select it.
#[must_use]
pub fn normalize_product_detail(product: &Value, reviews: &Value) -> ProductDetail {
    let product = is_record(product).then(|| normalize_product(product));
    let mut reviews = normalize_reviews(reviews);
    if let Some(product) = &product {
        for review in reviews.iter_mut().filter(|r| r.product_id.is_empty()) {
            review.product_id = product.id.clone();
        }
    }
    ProductDetail { product, reviews }
}
