//! Command implementations.
//!
//! Each command runs against an [`AppState`] opened from the environment and
//! prints its result as pretty JSON.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod cms;
pub mod wishlist;

use serde::Serialize;
use serde_json::Value;
use shopx_client::store::FileStorage;
use shopx_client::{AppState, ConfigError, ShopxConfig, ShopxError};
use shopx_core::{Cart, Product, UserId, format_price};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A client call failed.
    #[error(transparent)]
    Client(#[from] ShopxError),

    /// Output could not be encoded.
    #[error("Output encoding error: {0}")]
    Output(#[from] serde_json::Error),

    /// The command needs a signed-in user.
    #[error("Not signed in. Run `shopx login` first")]
    NotSignedIn,

    /// No product with the given id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Open persisted state under the configured state directory.
///
/// # Errors
///
/// Returns an error if the state directory cannot be created or the client
/// cannot be built.
pub fn open_state(config: ShopxConfig) -> Result<AppState, CliError> {
    let storage = FileStorage::open(config.state_dir.clone())?;
    tracing::debug!(
        site = %config.site_name,
        state_dir = %storage.dir().display(),
        "Opened state directory"
    );
    Ok(AppState::new(config, storage)?)
}

/// Id of the signed-in user.
fn require_user(state: &AppState) -> Result<UserId, CliError> {
    state.store().current_user_id().ok_or(CliError::NotSignedIn)
}

/// A product as printed: the record plus `formattedPrice` and, when it has
/// an image, `imageUrl` resolved against the CDN.
fn product_view(config: &ShopxConfig, product: &Product) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(product)?;
    if let Value::Object(fields) = &mut value {
        fields.insert("formattedPrice".to_string(), format_price(product.price).into());
        if let Some(image) = &product.image {
            fields.insert("imageUrl".to_string(), config.resolve_image_url(&image.url).into());
        }
    }
    Ok(value)
}

fn products_view(config: &ShopxConfig, products: &[Product]) -> Result<Value, CliError> {
    products
        .iter()
        .map(|product| product_view(config, product))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// A cart as printed, with `itemCount` and `formattedTotal`.
fn cart_view(config: &ShopxConfig, cart: &Cart) -> Result<Value, CliError> {
    let items = cart
        .items
        .iter()
        .map(|item| -> Result<Value, CliError> {
            Ok(serde_json::json!({
                "product": product_view(config, &item.product)?,
                "quantity": item.quantity,
                "subtotal": format_price(item.subtotal()),
            }))
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    Ok(serde_json::json!({
        "userId": cart.user_id,
        "items": items,
        "itemCount": cart.item_count(),
        "total": cart.total,
        "formattedTotal": format_price(cart.total),
    }))
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(id: &str, price: f64, image: Option<&str>) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "name": id.to_uppercase(),
            "price": price,
            "image": image.map(|url| json!({"url": url})),
        }))
        .unwrap()
    }

    #[test]
    fn test_product_view_formats_price_and_resolves_image() {
        let config = ShopxConfig {
            image_cdn_url: Some("https://cdn.shopx.app/".to_string()),
            ..ShopxConfig::default()
        };

        let view = product_view(&config, &product("p1", 1234.5, Some("/img/p1.jpg"))).unwrap();
        assert_eq!(view["formattedPrice"], "1.234,50 €");
        assert_eq!(view["imageUrl"], "https://cdn.shopx.app/img/p1.jpg");
        assert_eq!(view["id"], "p1");

        let bare = product_view(&config, &product("p2", 3.0, None)).unwrap();
        assert!(bare.get("imageUrl").is_none());
    }

    #[test]
    fn test_cart_view_counts_units_and_formats_total() {
        let cart: Cart = serde_json::from_value(json!({
            "userId": "u1",
            "total": 10.5,
            "items": [
                {"quantity": 2, "product": product("a", 1.5, None)},
                {"quantity": 3, "product": product("b", 2.5, None)},
            ],
        }))
        .unwrap();

        let view = cart_view(&ShopxConfig::default(), &cart).unwrap();
        assert_eq!(view["itemCount"], 5);
        assert_eq!(view["formattedTotal"], "10,50 €");
        assert_eq!(view["items"][1]["subtotal"], "7,50 €");
        assert_eq!(view["items"][0]["product"]["formattedPrice"], "1,50 €");
    }
}
