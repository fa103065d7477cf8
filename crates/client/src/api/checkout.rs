//! Orders, addresses and payments.

use rust_decimal::Decimal;
use shopx_core::normalize::{
    normalize_address, normalize_addresses, normalize_order, normalize_orders, normalize_payment,
};
use shopx_core::{Address, Order, OrderId, Payment, UserId};
use tracing::instrument;

use super::{CachedQuery, Mutation, ShopxApi, missing};
use crate::cache::{CacheValue, Tag, TagKind};
use crate::error::{Result, ShopxError};
use crate::graphql::{
    AddAddress, AddAddressData, AddAddressVariables, CreateOrder, CreateOrderData,
    CreateOrderVariables, CreatePayment, CreatePaymentData, CreatePaymentVariables, GetAddresses,
    GetAddressesData, GetOrders, GetOrdersData, OrderProductInput, UserVariables,
};
use crate::store::{OrdersAction, Store};
use crate::transport::Transport;

impl CachedQuery for GetOrders {
    type Output = Vec<Order>;

    const USER_SCOPED: bool = true;

    fn normalize(data: GetOrdersData) -> Self::Output {
        normalize_orders(&data.get_orders)
    }

    fn provides(_output: &Self::Output) -> Vec<Tag> {
        vec![Tag::list(TagKind::Order)]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::Orders(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::Orders(orders) => Some(orders),
            _ => None,
        }
    }

    fn on_success(store: &Store, output: &Self::Output) {
        store.dispatch(OrdersAction::Set(output.clone()));
    }
}

impl Mutation for CreateOrder {
    type Output = Order;

    fn normalize(data: CreateOrderData) -> Result<Order> {
        if data.create_order.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_order(&data.create_order))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Cart), Tag::list(TagKind::Order)]
    }
}

impl CachedQuery for GetAddresses {
    type Output = Vec<Address>;

    const USER_SCOPED: bool = true;

    fn normalize(data: GetAddressesData) -> Self::Output {
        normalize_addresses(&data.get_addresses)
    }

    fn provides(_output: &Self::Output) -> Vec<Tag> {
        vec![Tag::list(TagKind::Address)]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::Addresses(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::Addresses(addresses) => Some(addresses),
            _ => None,
        }
    }
}

impl Mutation for AddAddress {
    type Output = Address;

    fn normalize(data: AddAddressData) -> Result<Address> {
        if data.add_address.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_address(&data.add_address))
    }

    // The user context embeds addresses, so the session aggregate goes too.
    fn invalidates() -> Vec<Tag> {
        vec![Tag::list(TagKind::Address), Tag::current(TagKind::Session)]
    }
}

impl Mutation for CreatePayment {
    type Output = Payment;

    fn normalize(data: CreatePaymentData) -> Result<Payment> {
        if data.create_payment.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_payment(&data.create_payment))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Order)]
    }
}

impl<T: Transport> ShopxApi<T> {
    /// Fetch a user's orders and write them into the orders slice.
    ///
    /// # Errors
    ///
    /// Returns [`ShopxError::NotHydrated`] before rehydration, otherwise any
    /// request error.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn get_orders(&self, user_id: &UserId) -> Result<Vec<Order>> {
        self.query::<GetOrders>(UserVariables::new(user_id.clone()))
            .await
    }

    /// Place an order for the given lines.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `products` is empty, otherwise any
    /// request error.
    #[instrument(skip(self, user_id, products), fields(user_id = %user_id, lines = products.len()))]
    pub async fn create_order(
        &self,
        user_id: &UserId,
        products: Vec<OrderProductInput>,
    ) -> Result<Order> {
        if products.is_empty() {
            return Err(ShopxError::validation("an order needs at least one product"));
        }
        self.mutate::<CreateOrder>(CreateOrderVariables {
            user_id: user_id.clone(),
            products,
        })
        .await
    }

    /// Place an order for everything currently in the cart slice, priced
    /// at the cart's prices.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the cart is empty, otherwise any
    /// request error.
    pub async fn checkout_cart(&self, user_id: &UserId) -> Result<Order> {
        let products = self
            .store()
            .cart()
            .items
            .into_iter()
            .map(|line| OrderProductInput {
                product_id: line.product.id,
                quantity: line.quantity,
                price: line.product.price,
            })
            .collect();
        self.create_order(user_id, products).await
    }

    /// # Errors
    ///
    /// Returns [`ShopxError::NotHydrated`] before rehydration, otherwise any
    /// request error.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn get_addresses(&self, user_id: &UserId) -> Result<Vec<Address>> {
        self.query::<GetAddresses>(UserVariables::new(user_id.clone()))
            .await
    }

    /// # Errors
    ///
    /// Returns a validation error naming the first empty field, otherwise
    /// any request error.
    #[instrument(skip(self, address), fields(user_id = %address.user_id))]
    pub async fn add_address(&self, address: AddAddressVariables) -> Result<Address> {
        let fields = [
            ("userId", address.user_id.as_str()),
            ("street", address.street.as_str()),
            ("city", address.city.as_str()),
            ("postalCode", address.postal_code.as_str()),
            ("country", address.country.as_str()),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ShopxError::validation(format!("{name} cannot be empty")));
        }
        self.mutate::<AddAddress>(address).await
    }

    /// Record a payment against an order.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount, otherwise any
    /// request error.
    #[instrument(skip(self, order_id), fields(order_id = %order_id))]
    pub async fn create_payment(
        &self,
        order_id: &OrderId,
        amount: Decimal,
        method: &str,
    ) -> Result<Payment> {
        if amount <= Decimal::ZERO {
            return Err(ShopxError::validation("payment amount must be positive"));
        }
        self.mutate::<CreatePayment>(CreatePaymentVariables {
            order_id: order_id.clone(),
            amount,
            method: method.to_string(),
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use shopx_core::{CartItem, Product};

    use super::*;
    use crate::api::test_support::Scripted;
    use crate::cache::QueryCache;
    use crate::graphql::Operation;
    use crate::store::CartAction;

    fn api(transport: Arc<Scripted>) -> ShopxApi<Arc<Scripted>> {
        let store = Store::in_memory();
        store.rehydrate();
        ShopxApi::new(transport, store, QueryCache::new(10, Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_orders_fill_slice() {
        let transport = Arc::new(Scripted::new().on(
            Operation::GetOrders,
            Ok(json!({"getOrders": [
                {"id": "o1", "userId": "u1", "total": "19.90", "status": "PAID",
                 "products": [{"productId": "p1", "quantity": 2, "price": 9.95}]}
            ]})),
        ));
        let api = api(transport);

        let orders = api.get_orders(&UserId::from("u1")).await.unwrap();
        assert_eq!(orders[0].total, Decimal::new(1990, 2));

        let slice = api.store().orders();
        assert_eq!(slice.orders.len(), 1);
        assert!(slice.last_updated_at.is_some());
    }

    #[tokio::test]
    async fn test_validation_rejects_before_request() {
        let transport = Arc::new(Scripted::new());
        let api = api(Arc::clone(&transport));
        let user = UserId::from("u1");

        assert!(matches!(
            api.create_order(&user, Vec::new()).await,
            Err(ShopxError::Validation(_))
        ));
        assert!(matches!(
            api.checkout_cart(&user).await,
            Err(ShopxError::Validation(_))
        ));
        assert!(matches!(
            api.create_payment(&OrderId::from("o1"), Decimal::ZERO, "card")
                .await,
            Err(ShopxError::Validation(_))
        ));

        let err = api
            .add_address(AddAddressVariables {
                user_id: user,
                street: "Main 1".to_string(),
                city: " ".to_string(),
                postal_code: "010101".to_string(),
                country: "RO".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: city cannot be empty");
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_checkout_sends_cart_lines() {
        let transport = Arc::new(Scripted::new().on(
            Operation::CreateOrder,
            Ok(json!({"createOrder": {"id": "o9", "userId": "u1", "total": 25, "status": "PENDING"}})),
        ));
        let api = api(Arc::clone(&transport));
        api.store().dispatch(CartAction::UpsertItem(CartItem {
            product: Product {
                id: "p1".into(),
                price: Decimal::new(125, 1),
                ..Product::default()
            },
            quantity: 2,
        }));

        let order = api.checkout_cart(&UserId::from("u1")).await.unwrap();
        assert_eq!(order.id, "o9");

        let sent = transport.requests.lock()[0].variables.clone();
        assert_eq!(
            sent["products"],
            json!([{"productId": "p1", "quantity": 2, "price": 12.5}])
        );
    }

    #[tokio::test]
    async fn test_add_address_invalidates_address_list() {
        let transport = Arc::new(
            Scripted::new()
                .on(Operation::GetAddresses, Ok(json!({"getAddresses": []})))
                .on(
                    Operation::AddAddress,
                    Ok(json!({"addAddress": {"id": "a1", "userId": "u1", "street": "Main 1"}})),
                ),
        );
        let api = api(Arc::clone(&transport));
        let user = UserId::from("u1");

        api.get_addresses(&user).await.unwrap();
        api.add_address(AddAddressVariables {
            user_id: user.clone(),
            street: "Main 1".to_string(),
            city: "Cluj".to_string(),
            postal_code: "400000".to_string(),
            country: "RO".to_string(),
        })
        .await
        .unwrap();
        api.get_addresses(&user).await.unwrap();

        assert_eq!(transport.calls(Operation::GetAddresses), 2);
    }
}
