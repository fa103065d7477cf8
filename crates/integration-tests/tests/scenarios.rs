//! End-to-end flows: catalog filtering, cart round trip, sign-in and
//! sign-out.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde_json::json;
use shopx_client::graphql::{GetProductsVariables, Operation};
use shopx_client::store::{CartAction, OrdersAction, WishlistAction};
use shopx_client::{MockDataset, MockFallback, MockMode};
use shopx_core::{CategoryId, Order, Product, ProductId, UserId};
use shopx_integration_tests::{FailingTransport, ScriptedTransport, hydrated_api};

fn cart_payload(root: &str, user: &str, quantity: u32, price: f64) -> serde_json::Value {
    let mut data = serde_json::Map::new();
    data.insert(
        root.to_string(),
        json!({
            "userId": user,
            "total": price * f64::from(quantity),
            "items": [{"quantity": quantity, "product": {"id": "p1", "name": "Pen", "price": price}}]
        }),
    );
    serde_json::Value::Object(data)
}

#[tokio::test]
async fn products_filtered_by_category_from_fixtures() {
    let transport = MockFallback::new(FailingTransport::new(), MockMode::NetworkErrors);
    let api = hydrated_api(transport);

    let products = api
        .get_products(GetProductsVariables {
            category_id: Some(CategoryId::from("cat-electronics")),
            ..GetProductsVariables::default()
        })
        .await
        .unwrap();

    assert!(!products.is_empty());
    assert!(
        products
            .iter()
            .all(|p| p.category_id.as_ref().is_some_and(|c| c == "cat-electronics"))
    );
}

#[tokio::test]
async fn add_to_cart_then_get_cart_from_fixtures() {
    let p1 = Product {
        id: ProductId::from("p1"),
        name: "Test product".to_string(),
        price: Decimal::new(4250, 2),
        ..Product::default()
    };
    let dataset = MockDataset::new().with_product(p1);
    let transport = MockFallback::with_dataset(FailingTransport::new(), MockMode::NetworkErrors, dataset);
    let api = hydrated_api(transport);
    let user = UserId::from("u1");

    api.add_to_cart(&user, &ProductId::from("p1"), 1).await.unwrap();
    let cart = api.get_cart(&user).await.unwrap();

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product.id, "p1");
    assert_eq!(cart.items[0].quantity, 1);
    assert_eq!(cart.total, Decimal::new(4250, 2));
    assert_eq!(api.store().cart().total, Decimal::new(4250, 2));
}

#[tokio::test]
async fn quantity_edit_after_direct_add_lands_on_requested_value() {
    let p1 = Product {
        id: ProductId::from("p1"),
        name: "Test product".to_string(),
        price: Decimal::new(4250, 2),
        ..Product::default()
    };
    let dataset = MockDataset::new().with_product(p1.clone());
    let transport = MockFallback::with_dataset(FailingTransport::new(), MockMode::NetworkErrors, dataset);
    let api = hydrated_api(transport);
    let user = UserId::from("u1");

    api.add_to_cart(&user, &p1.id, 2).await.unwrap();
    assert_eq!(api.store().cart().quantity_of(&p1.id), 2);

    let cart = api.set_cart_quantity(&user, &p1, 1).await.unwrap();
    assert_eq!(cart.item(&p1.id).map(|item| item.quantity), Some(1));
    assert_eq!(api.store().cart().quantity_of(&p1.id), 1);

    let server = api.get_cart(&user).await.unwrap();
    assert_eq!(server.item(&p1.id).map(|item| item.quantity), Some(1));
    assert_eq!(server.total, Decimal::new(4250, 2));
}

#[tokio::test]
async fn login_replaces_session_and_drops_cached_cart() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with(Operation::GetCart, Ok(cart_payload("getCart", "u1", 5, 1.0)))
            .with(
                Operation::Login,
                Ok(json!({"login": {
                    "token": "fresh-token",
                    "user": {"id": "u1", "email": "ana@shopx.app", "name": "Ana", "role": "CUSTOMER"}
                }})),
            ),
    );
    let api = hydrated_api(Arc::clone(&transport));
    let user = UserId::from("u1");

    api.get_cart(&user).await.unwrap();
    api.store()
        .dispatch(WishlistAction::Set(vec![Product::default()]));

    api.login("ana@shopx.app", "secret").await.unwrap();

    let session = api.store().session();
    assert_eq!(session.token.unwrap().expose_secret(), "fresh-token");
    assert_eq!(session.user.unwrap().email, "ana@shopx.app");
    assert!(api.store().cart().items.is_empty());
    assert!(api.store().wishlist().products.is_empty());

    transport.set(Operation::GetCart, Ok(cart_payload("getCart", "u1", 2, 3.0)));
    let cart = api.get_cart(&user).await.unwrap();
    assert_eq!(transport.calls(Operation::GetCart), 2);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(api.store().cart().items[0].quantity, 2);
}

#[tokio::test]
async fn logout_clears_every_slice_when_the_request_fails() {
    let transport = Arc::new(ScriptedTransport::new().with(
        Operation::Login,
        Ok(json!({"login": {"token": "t", "user": {"id": "u1", "email": "a@shopx.app"}}})),
    ));
    let api = hydrated_api(Arc::clone(&transport));

    api.login("a@shopx.app", "pw").await.unwrap();
    api.store().dispatch_all([
        shopx_client::store::Action::from(CartAction::UpsertItem(shopx_core::CartItem {
            product: Product {
                id: ProductId::from("p1"),
                ..Product::default()
            },
            quantity: 1,
        })),
        shopx_client::store::Action::from(WishlistAction::Add(Product::default())),
        shopx_client::store::Action::from(OrdersAction::Set(vec![Order::default()])),
    ]);

    // Logout is unscripted, so the transport fails
    assert!(api.logout().await.is_err());
    assert_eq!(transport.calls(Operation::Logout), 1);

    let state = api.store().snapshot();
    assert!(state.session.token.is_none());
    assert!(state.session.user.is_none());
    assert!(state.cart.items.is_empty());
    assert!(state.wishlist.products.is_empty());
    assert!(state.orders.orders.is_empty());
}
