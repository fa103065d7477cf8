//! Tag invalidation, request deduplication and the mock fallback.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use shopx_client::graphql::{GetCart, GetProductsVariables, Operation, UpdateUserProfileInput};
use shopx_client::{MockFallback, MockMode, QueryStatus, ShopxError};
use shopx_core::{ProductId, UserId};
use shopx_integration_tests::{FailingTransport, ScriptedTransport, hydrated_api};

fn scripted_shop() -> ScriptedTransport {
    ScriptedTransport::new()
        .with(
            Operation::GetProducts,
            Ok(json!({"getProducts": [{"id": "p1", "name": "Pen", "price": 2}]})),
        )
        .with(
            Operation::GetCart,
            Ok(json!({"getCart": {"userId": "u1", "total": 0, "items": []}})),
        )
        .with(
            Operation::AddToCart,
            Ok(json!({"addToCart": {"userId": "u1", "total": 2, "items": [
                {"quantity": 1, "product": {"id": "p1", "price": 2}}
            ]}})),
        )
}

#[tokio::test]
async fn mutation_refetches_only_queries_with_matching_tags() {
    let transport = Arc::new(scripted_shop());
    let api = hydrated_api(Arc::clone(&transport));
    let user = UserId::from("u1");

    api.get_products(GetProductsVariables::default()).await.unwrap();
    api.get_cart(&user).await.unwrap();
    let subscription = api
        .subscribe::<GetCart>(shopx_client::graphql::UserVariables::new(user.clone()))
        .unwrap();

    api.add_to_cart(&user, &ProductId::from("p1"), 1).await.unwrap();

    assert_eq!(transport.calls(Operation::GetCart), 2);
    assert_eq!(subscription.status(), QueryStatus::Fulfilled);

    api.get_products(GetProductsVariables::default()).await.unwrap();
    assert_eq!(transport.calls(Operation::GetProducts), 1);
}

#[tokio::test]
async fn failed_mutation_invalidates_nothing() {
    let transport = Arc::new(scripted_shop());
    let api = hydrated_api(Arc::clone(&transport));
    let user = UserId::from("u1");

    api.get_cart(&user).await.unwrap();
    assert!(api.clear_cart(&user).await.is_err());

    api.get_cart(&user).await.unwrap();
    assert_eq!(transport.calls(Operation::GetCart), 1);
}

#[tokio::test]
async fn concurrent_identical_queries_share_one_request() {
    let transport = Arc::new(scripted_shop());
    let api = hydrated_api(Arc::clone(&transport));

    let filter = GetProductsVariables::default();
    let (a, b, c) = tokio::join!(
        api.get_products(filter.clone()),
        api.get_products(filter.clone()),
        api.get_products(filter),
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(c.unwrap().len(), 1);
    assert_eq!(transport.calls(Operation::GetProducts), 1);
}

#[tokio::test]
async fn mock_fallback_is_stable_and_warns_once() {
    let transport = Arc::new(MockFallback::new(
        FailingTransport::new(),
        MockMode::NetworkErrors,
    ));
    let api = hydrated_api(Arc::clone(&transport));

    let first = api.get_categories().await.unwrap();
    for _ in 0..4 {
        api.cache().invalidate_all().await;
        let again = api.get_categories().await.unwrap();
        assert_eq!(again, first);
    }

    assert_eq!(transport.inner().calls(), 5);
    assert_eq!(transport.warnings_emitted(), 1);

    api.get_cms_pages().await.unwrap();
    assert_eq!(transport.warnings_emitted(), 2);
}

#[tokio::test]
async fn operations_without_handler_propagate_original_error() {
    for mode in [MockMode::Off, MockMode::NetworkErrors, MockMode::AnyError] {
        let transport = Arc::new(MockFallback::new(FailingTransport::new(), mode));
        let api = hydrated_api(Arc::clone(&transport));

        let err = api
            .update_user_profile(UpdateUserProfileInput {
                name: Some("Ana".to_string()),
                email: None,
                current_password: "pw".to_string(),
            })
            .await
            .unwrap_err();

        assert!(
            matches!(&err, ShopxError::Status { status: 503, .. }),
            "{mode}: {err}"
        );
        assert_eq!(err.to_string(), FailingTransport::error().to_string());
        assert_eq!(transport.warnings_emitted(), 0);
    }
}

#[tokio::test]
async fn fallback_off_never_substitutes() {
    let transport = MockFallback::new(FailingTransport::new(), MockMode::Off);
    let api = hydrated_api(transport);

    assert!(api.get_categories().await.unwrap_err().is_transport());
}
