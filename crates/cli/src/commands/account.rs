//! Session, account data and UI preferences.

use shopx_client::AppState;
use shopx_client::store::{ThemePreference, UiAction};

use super::{CliError, print_json, require_user};

/// Sign in. Prints the user; the bearer token stays in the state directory.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(), CliError> {
    let payload = state.api().login(email, password).await?;
    print_json(&payload.user)
}

/// Sign out. Local state is cleared even when the request fails.
pub async fn logout(state: &AppState) -> Result<(), CliError> {
    let acknowledged = state.api().logout().await?;
    print_json(&serde_json::json!({ "loggedOut": acknowledged }))
}

/// Refresh user, cart, wishlist and addresses in one round trip.
pub async fn context(state: &AppState) -> Result<(), CliError> {
    require_user(state)?;
    let context = state.api().bootstrap_user_context().await?;
    print_json(&context)
}

pub async fn orders(state: &AppState) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    print_json(&state.api().get_orders(&user_id).await?)
}

pub async fn addresses(state: &AppState) -> Result<(), CliError> {
    let user_id = require_user(state)?;
    print_json(&state.api().get_addresses(&user_id).await?)
}

pub fn theme(state: &AppState, theme: ThemePreference) -> Result<(), CliError> {
    state.store().dispatch(UiAction::SetTheme(theme));
    print_json(&state.store().ui())
}
