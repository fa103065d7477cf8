//! CMS content pages.

use shopx_client::AppState;

use super::{CliError, print_json};

/// Show a page by slug. Prints `null` for an unknown slug.
pub async fn show(state: &AppState, slug: &str) -> Result<(), CliError> {
    let page = state.api().get_cms_page(slug).await?;
    if page.is_none() {
        tracing::warn!(slug, "No CMS page with this slug");
    }
    print_json(&page)
}

pub async fn list(state: &AppState) -> Result<(), CliError> {
    print_json(&state.api().get_cms_pages().await?)
}
