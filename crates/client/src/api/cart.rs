//! Cart reads, edits and quantity reconciliation.

use shopx_core::normalize::normalize_cart;
use shopx_core::{Cart, CartItem, Product, ProductId, UserId};
use tracing::{debug, instrument, warn};

use super::{CachedQuery, Mutation, ShopxApi, missing};
use crate::cache::{CacheValue, Tag, TagKind};
use crate::error::{Result, ShopxError};
use crate::graphql::{
    AddToCart, AddToCartData, AddToCartVariables, ClearCart, ClearCartData, GetCart, GetCartData,
    RemoveFromCart, RemoveFromCartData, UserProductVariables, UserVariables,
};
use crate::store::{CartAction, Store};
use crate::transport::Transport;

impl CachedQuery for GetCart {
    type Output = Cart;

    const USER_SCOPED: bool = true;

    fn normalize(data: GetCartData) -> Self::Output {
        normalize_cart(&data.get_cart)
    }

    fn provides(_output: &Self::Output) -> Vec<Tag> {
        vec![Tag::current(TagKind::Cart)]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::Cart(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::Cart(cart) => Some(cart),
            _ => None,
        }
    }

    fn on_success(store: &Store, output: &Self::Output) {
        store.dispatch(CartAction::Set(output.clone()));
    }
}

impl Mutation for AddToCart {
    type Output = Cart;

    fn normalize(data: AddToCartData) -> Result<Cart> {
        if data.add_to_cart.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_cart(&data.add_to_cart))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Cart)]
    }

    fn on_success(store: &Store, output: &Cart) {
        store.dispatch(CartAction::Set(output.clone()));
    }
}

impl Mutation for RemoveFromCart {
    type Output = Cart;

    fn normalize(data: RemoveFromCartData) -> Result<Cart> {
        if data.remove_from_cart.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_cart(&data.remove_from_cart))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Cart)]
    }

    fn on_success(store: &Store, output: &Cart) {
        store.dispatch(CartAction::Set(output.clone()));
    }
}

impl Mutation for ClearCart {
    type Output = Cart;

    fn normalize(data: ClearCartData) -> Result<Cart> {
        if data.clear_cart.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_cart(&data.clear_cart))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Cart)]
    }

    fn on_success(store: &Store, output: &Cart) {
        store.dispatch(CartAction::Set(output.clone()));
    }
}

impl<T: Transport> ShopxApi<T> {
    /// Fetch a user's cart and write it into the cart slice.
    ///
    /// # Errors
    ///
    /// Returns [`ShopxError::NotHydrated`] before rehydration, otherwise any
    /// request error.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn get_cart(&self, user_id: &UserId) -> Result<Cart> {
        self.query::<GetCart>(UserVariables::new(user_id.clone()))
            .await
    }

    /// Add `quantity` units of a product, incrementing an existing line.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero quantity, otherwise any request
    /// error.
    #[instrument(skip(self, user_id, product_id), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart> {
        if quantity == 0 {
            return Err(ShopxError::validation("quantity must be at least 1"));
        }
        self.mutate::<AddToCart>(AddToCartVariables {
            user_id: user_id.clone(),
            product_id: product_id.clone(),
            quantity,
        })
        .await
    }

    /// Drop a product's line entirely.
    ///
    /// # Errors
    ///
    /// Returns any request error.
    #[instrument(skip(self, user_id, product_id), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove_from_cart(&self, user_id: &UserId, product_id: &ProductId) -> Result<Cart> {
        self.mutate::<RemoveFromCart>(UserProductVariables {
            user_id: user_id.clone(),
            product_id: product_id.clone(),
        })
        .await
    }

    /// # Errors
    ///
    /// Returns any request error.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn clear_cart(&self, user_id: &UserId) -> Result<Cart> {
        self.mutate::<ClearCart>(UserVariables::new(user_id.clone()))
            .await
    }

    /// Set a product's quantity, updating the cart slice immediately.
    ///
    /// The server is reconciled through `addToCart` and `removeFromCart`
    /// only:
    ///
    /// | local change | requests |
    /// |--------------|----------|
    /// | unchanged    | none |
    /// | grow         | `addToCart(delta)` |
    /// | shrink       | `removeFromCart`, then `addToCart(quantity)` |
    /// | to zero      | `removeFromCart` |
    ///
    /// On success the server's cart replaces the slice. On failure the cart
    /// is refetched, overwriting the local edit, and the original error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failed request.
    #[instrument(
        skip(self, user_id, product),
        fields(user_id = %user_id, product_id = %product.id)
    )]
    pub async fn set_cart_quantity(
        &self,
        user_id: &UserId,
        product: &Product,
        quantity: u32,
    ) -> Result<Cart> {
        let store = self.store();
        let current = store.cart().quantity_of(&product.id);
        if current == quantity {
            debug!(quantity, "Quantity unchanged");
            return Ok(store.cart().to_cart());
        }

        store.dispatch(if quantity == 0 {
            CartAction::RemoveItem(product.id.clone())
        } else {
            CartAction::UpsertItem(CartItem {
                product: product.clone(),
                quantity,
            })
        });

        match self.reconcile_quantity(user_id, &product.id, current, quantity).await {
            Ok(cart) => {
                store.dispatch(CartAction::Set(cart.clone()));
                Ok(cart)
            }
            Err(e) => {
                warn!(error = %e, "Cart quantity sync failed, refetching cart");
                self.invalidate(&[Tag::current(TagKind::Cart)]).await;
                if let Err(refetch) = self.get_cart(user_id).await {
                    warn!(error = %refetch, "Cart refetch after failed sync also failed");
                }
                Err(e)
            }
        }
    }

    async fn reconcile_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        current: u32,
        target: u32,
    ) -> Result<Cart> {
        if target > current {
            return self.add_to_cart(user_id, product_id, target - current).await;
        }
        let cart = self.remove_from_cart(user_id, product_id).await?;
        if target == 0 {
            return Ok(cart);
        }
        self.add_to_cart(user_id, product_id, target).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    use super::*;
    use crate::api::test_support::Scripted;
    use crate::cache::QueryCache;
    use crate::graphql::Operation;

    fn api(transport: Arc<Scripted>) -> ShopxApi<Arc<Scripted>> {
        let store = Store::in_memory();
        store.rehydrate();
        ShopxApi::new(transport, store, QueryCache::new(10, Duration::from_secs(60)))
    }

    fn pen() -> Product {
        Product {
            id: ProductId::from("p1"),
            name: "Pen".to_string(),
            price: Decimal::from(2),
            ..Product::default()
        }
    }

    fn cart(root: &str, quantity: u32) -> Value {
        let items = if quantity == 0 {
            json!([])
        } else {
            json!([{"quantity": quantity, "product": {"id": "p1", "name": "Pen", "price": 2}}])
        };
        let mut data = serde_json::Map::new();
        data.insert(
            root.to_string(),
            json!({"userId": "u1", "total": 2 * quantity, "items": items}),
        );
        Value::Object(data)
    }

    fn gateway_down() -> ShopxError {
        ShopxError::Status {
            status: 502,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_zero_quantity() {
        let transport = Arc::new(Scripted::new());
        let api = api(Arc::clone(&transport));
        let err = api
            .add_to_cart(&UserId::from("u1"), &ProductId::from("p1"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopxError::Validation(_)));
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_null_mutation_result_is_missing_data() {
        let transport =
            Arc::new(Scripted::new().on(Operation::ClearCart, Ok(json!({"clearCart": null}))));
        let api = api(transport);
        let err = api.clear_cart(&UserId::from("u1")).await.unwrap_err();
        assert!(matches!(err, ShopxError::MissingData(Operation::ClearCart)));
    }

    #[tokio::test]
    async fn test_direct_mutations_replace_cart_slice() {
        let transport = Arc::new(
            Scripted::new()
                .on(Operation::AddToCart, Ok(cart("addToCart", 2)))
                .on(Operation::RemoveFromCart, Ok(cart("removeFromCart", 0))),
        );
        let api = api(Arc::clone(&transport));
        let user = UserId::from("u1");

        api.add_to_cart(&user, &pen().id, 2).await.unwrap();
        assert_eq!(api.store().cart().quantity_of(&pen().id), 2);
        assert_eq!(api.store().cart().total, Decimal::from(4));

        api.remove_from_cart(&user, &pen().id).await.unwrap();
        assert!(api.store().cart().items.is_empty());
    }

    #[tokio::test]
    async fn test_quantity_after_add_shrinks_from_server_quantity() {
        let transport = Arc::new(
            Scripted::new()
                .on(Operation::AddToCart, Ok(cart("addToCart", 2)))
                .on(Operation::RemoveFromCart, Ok(cart("removeFromCart", 0))),
        );
        let api = api(Arc::clone(&transport));
        let user = UserId::from("u1");

        api.add_to_cart(&user, &pen().id, 2).await.unwrap();
        transport.set(Operation::AddToCart, Ok(cart("addToCart", 1)));
        let cart = api.set_cart_quantity(&user, &pen(), 1).await.unwrap();

        assert_eq!(cart.items[0].quantity, 1);
        assert_eq!(api.store().cart().quantity_of(&pen().id), 1);
        let requests = transport.requests.lock();
        let names: Vec<_> = requests.iter().map(|r| r.operation_name).collect();
        assert_eq!(names, ["AddToCart", "RemoveFromCart", "AddToCart"]);
        assert_eq!(requests[2].variables["quantity"], 1);
    }

    #[tokio::test]
    async fn test_grow_sends_delta() {
        let transport = Arc::new(Scripted::new().on(Operation::AddToCart, Ok(cart("addToCart", 3))));
        let api = api(Arc::clone(&transport));
        api.store().dispatch(CartAction::UpsertItem(CartItem {
            product: pen(),
            quantity: 1,
        }));

        let cart = api
            .set_cart_quantity(&UserId::from("u1"), &pen(), 3)
            .await
            .unwrap();

        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(api.store().cart().quantity_of(&pen().id), 3);
        let sent = transport.requests.lock()[0].variables.clone();
        assert_eq!(sent["quantity"], 2);
        assert_eq!(transport.calls(Operation::RemoveFromCart), 0);
    }

    #[tokio::test]
    async fn test_shrink_removes_then_adds() {
        let transport = Arc::new(
            Scripted::new()
                .on(Operation::RemoveFromCart, Ok(cart("removeFromCart", 0)))
                .on(Operation::AddToCart, Ok(cart("addToCart", 1))),
        );
        let api = api(Arc::clone(&transport));
        api.store().dispatch(CartAction::UpsertItem(CartItem {
            product: pen(),
            quantity: 4,
        }));

        api.set_cart_quantity(&UserId::from("u1"), &pen(), 1)
            .await
            .unwrap();

        let names: Vec<_> = transport
            .requests
            .lock()
            .iter()
            .map(|r| r.operation_name)
            .collect();
        assert_eq!(names, ["RemoveFromCart", "AddToCart"]);
        assert_eq!(transport.requests.lock()[1].variables["quantity"], 1);
        assert_eq!(api.store().cart().total, Decimal::from(2));
    }

    #[tokio::test]
    async fn test_zero_only_removes_and_unchanged_is_silent() {
        let transport = Arc::new(
            Scripted::new().on(Operation::RemoveFromCart, Ok(cart("removeFromCart", 0))),
        );
        let api = api(Arc::clone(&transport));
        api.store().dispatch(CartAction::UpsertItem(CartItem {
            product: pen(),
            quantity: 2,
        }));

        api.set_cart_quantity(&UserId::from("u1"), &pen(), 2)
            .await
            .unwrap();
        assert_eq!(transport.total_calls(), 0);

        api.set_cart_quantity(&UserId::from("u1"), &pen(), 0)
            .await
            .unwrap();
        assert_eq!(transport.total_calls(), 1);
        assert!(api.store().cart().items.is_empty());
    }

    #[tokio::test]
    async fn test_failure_refetches_and_returns_original_error() {
        let transport = Arc::new(
            Scripted::new()
                .on(Operation::AddToCart, Err(gateway_down()))
                .on(Operation::GetCart, Ok(cart("getCart", 1))),
        );
        let api = api(Arc::clone(&transport));
        api.store().dispatch(CartAction::UpsertItem(CartItem {
            product: pen(),
            quantity: 1,
        }));

        let err = api
            .set_cart_quantity(&UserId::from("u1"), &pen(), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, ShopxError::Status { status: 502, .. }));
        assert_eq!(transport.calls(Operation::GetCart), 1);
        assert_eq!(api.store().cart().quantity_of(&pen().id), 1);
    }
}
