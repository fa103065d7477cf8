//! Cart of the signed-in user.

use shopx_client::AppState;
use shopx_core::ProductId;

use super::{CliError, cart_view, print_json, require_user};

pub async fn show(state: &AppState) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    let cart = state.api().get_cart(&user_id).await?;
    print_json(&cart_view(state.config(), &cart)?)
}

/// Increment a line by `quantity`.
pub async fn add(state: &AppState, product_id: &str, quantity: u32) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    let cart = state
        .api()
        .add_to_cart(&user_id, &ProductId::from(product_id), quantity)
        .await?;
    print_json(&cart_view(state.config(), &cart)?)
}

/// Set a line to an exact quantity, updating the local cart first.
pub async fn set(state: &AppState, product_id: &str, quantity: u32) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    let detail = state
        .api()
        .get_product_detail(&ProductId::from(product_id))
        .await?;
    let product = detail
        .product
        .ok_or_else(|| CliError::ProductNotFound(product_id.to_string()))?;

    let cart = state
        .api()
        .set_cart_quantity(&user_id, &product, quantity)
        .await?;
    print_json(&cart_view(state.config(), &cart)?)
}

pub async fn remove(state: &AppState, product_id: &str) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    let cart = state
        .api()
        .remove_from_cart(&user_id, &ProductId::from(product_id))
        .await?;
    print_json(&cart_view(state.config(), &cart)?)
}

pub async fn clear(state: &AppState) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    let cart = state.api().clear_cart(&user_id).await?;
    print_json(&cart_view(state.config(), &cart)?)
}
