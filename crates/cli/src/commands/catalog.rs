//! Catalog browsing: products, product detail and categories.

use shopx_client::AppState;
use shopx_client::graphql::GetProductsVariables;
use shopx_core::{CategoryId, ProductId};

use super::{CliError, print_json, product_view, products_view};

/// List products with optional filters.
pub async fn products(
    state: &AppState,
    category: Option<String>,
    name: Option<String>,
    offset: Option<u32>,
    limit: Option<u32>,
) -> Result<(), CliError> {
    let filter = GetProductsVariables {
        limit,
        offset,
        name,
        category_id: category.map(CategoryId::from),
    };
    let products = state.api().get_products(filter).await?;
    tracing::info!(count = products.len(), "Fetched products");
    print_json(&products_view(state.config(), &products)?)
}

/// Show one product with its reviews and average rating.
pub async fn product(state: &AppState, id: &str) -> Result<(), CliError> {
    let detail = state.api().get_product_detail(&ProductId::from(id)).await?;
    let Some(product) = &detail.product else {
        return Err(CliError::ProductNotFound(id.to_string()));
    };
    print_json(&serde_json::json!({
        "product": product_view(state.config(), product)?,
        "reviews": detail.reviews,
        "averageRating": detail.average_rating(),
    }))
}

pub async fn categories(state: &AppState) -> Result<(), CliError> {
    print_json(&state.api().get_categories().await?)
}
