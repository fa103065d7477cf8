//! Wishlist of the signed-in user.

use shopx_client::AppState;
use shopx_core::ProductId;

use super::{CliError, print_json, require_user};

pub async fn show(state: &AppState) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    print_json(&state.api().get_wishlist(&user_id).await?)
}

pub async fn add(state: &AppState, product_id: &str) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    let wishlist = state
        .api()
        .add_to_wishlist(&user_id, &ProductId::from(product_id))
        .await?;
    print_json(&wishlist)
}

pub async fn remove(state: &AppState, product_id: &str) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    let wishlist = state
        .api()
        .remove_from_wishlist(&user_id, &ProductId::from(product_id))
        .await?;
    print_json(&wishlist)
}
