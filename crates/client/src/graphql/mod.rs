//! Typed GraphQL operations.
//!
//! Each operation is a zero-sized marker implementing
//! [`graphql_client::GraphQLQuery`] with a hand-written document, a
//! variables struct and a response-data struct. Response roots are kept as
//! raw JSON so every payload passes through the normalizers in
//! `shopx_core::normalize` before reaching the cache or the store.

mod documents;
mod operation;

use graphql_client::{GraphQLQuery, QueryBody};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopx_core::{CategoryId, OrderId, ProductId, UserId};

pub use operation::Operation;

/// Request envelope as it travels through a transport.
pub type GraphQLRequest = QueryBody<Value>;

/// An operation marker that belongs to the closed [`Operation`] set.
pub trait ShopxOperation: GraphQLQuery {
    const OPERATION: Operation;
}

/// Build the untyped request envelope for an operation.
///
/// # Errors
///
/// Returns an error if the variables cannot be serialized.
pub fn build_request<Q: ShopxOperation>(
    variables: Q::Variables,
) -> Result<GraphQLRequest, serde_json::Error> {
    let body = Q::build_query(variables);
    Ok(QueryBody {
        variables: serde_json::to_value(body.variables)?,
        query: body.query,
        operation_name: body.operation_name,
    })
}

macro_rules! operation {
    ($(#[$meta:meta])* $name:ident, $document:expr, $variables:ty, $data:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $variables;
            type ResponseData = $data;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }

        impl ShopxOperation for $name {
            const OPERATION: Operation = Operation::$name;
        }
    };
}

// =============================================================================
// Variables
// =============================================================================

/// Variables for operations that take none. Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoVariables {}

/// Variables scoped to a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVariables {
    pub user_id: UserId,
}

impl UserVariables {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Variables naming a user and a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProductVariables {
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// Product listing filters and pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProductsVariables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProductDetailVariables {
    pub id: ProductId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartVariables {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Credentials for `login`. `Debug` redacts the password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginVariables {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginVariables")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account creation input. `Debug` redacts the password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterVariables {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl std::fmt::Debug for RegisterVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterVariables")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemImpersonationVariables {
    pub token: String,
}

impl std::fmt::Debug for RedeemImpersonationVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedeemImpersonationVariables")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Profile fields to change, confirmed with the current password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub current_password: String,
}

impl std::fmt::Debug for UpdateUserProfileInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserProfileInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("current_password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserProfileVariables {
    pub input: UpdateUserProfileInput,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserPasswordVariables {
    pub current_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for ChangeUserPasswordVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChangeUserPasswordVariables { .. }")
    }
}

/// A line of a new order, priced at checkout time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductInput {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderVariables {
    pub user_id: UserId,
    pub products: Vec<OrderProductInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAddressVariables {
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentVariables {
    pub order_id: OrderId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetCmsPageVariables {
    pub slug: String,
}

// =============================================================================
// Response data
// =============================================================================

macro_rules! response_data {
    ($name:ident { $($field:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Default, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(default)]
                pub $field: Value,
            )+
        }
    };
}

response_data!(GetProductsData { get_products });
response_data!(GetProductDetailData { product, reviews });
response_data!(GetCategoriesData { get_categories });
response_data!(GetCartData { get_cart });
response_data!(AddToCartData { add_to_cart });
response_data!(RemoveFromCartData { remove_from_cart });
response_data!(ClearCartData { clear_cart });
response_data!(GetWishlistData { get_wishlist });
response_data!(AddToWishlistData { add_to_wishlist });
response_data!(RemoveFromWishlistData { remove_from_wishlist });
response_data!(RegisterData { register });
response_data!(LoginData { login });
response_data!(LogoutData { logout });
response_data!(RedeemImpersonationData { redeem_impersonation });
response_data!(GetUserContextData { get_user_context });
response_data!(GetOrdersData { get_orders });
response_data!(UpdateUserProfileData { update_user_profile });
response_data!(ChangeUserPasswordData { change_user_password });
response_data!(CreateOrderData { create_order });
response_data!(AddAddressData { add_address });
response_data!(GetAddressesData { get_addresses });
response_data!(CreatePaymentData { create_payment });
response_data!(GetCmsPageData { get_cms_page });
response_data!(GetCmsPagesData { get_cms_pages });

// =============================================================================
// Operations
// =============================================================================

operation!(
    /// Product listing with category/name filters and offset pagination.
    GetProducts, documents::GET_PRODUCTS, GetProductsVariables, GetProductsData
);
operation!(
    /// A product and its reviews.
    GetProductDetail, documents::GET_PRODUCT_DETAIL, GetProductDetailVariables, GetProductDetailData
);
operation!(GetCategories, documents::GET_CATEGORIES, NoVariables, GetCategoriesData);
operation!(GetCart, documents::GET_CART, UserVariables, GetCartData);
operation!(
    /// Increment a cart line by `quantity`.
    AddToCart, documents::ADD_TO_CART, AddToCartVariables, AddToCartData
);
operation!(
    /// Drop a whole cart line.
    RemoveFromCart, documents::REMOVE_FROM_CART, UserProductVariables, RemoveFromCartData
);
operation!(ClearCart, documents::CLEAR_CART, UserVariables, ClearCartData);
operation!(GetWishlist, documents::GET_WISHLIST, UserVariables, GetWishlistData);
operation!(AddToWishlist, documents::ADD_TO_WISHLIST, UserProductVariables, AddToWishlistData);
operation!(
    RemoveFromWishlist,
    documents::REMOVE_FROM_WISHLIST,
    UserProductVariables,
    RemoveFromWishlistData
);
operation!(Register, documents::REGISTER, RegisterVariables, RegisterData);
operation!(Login, documents::LOGIN, LoginVariables, LoginData);
operation!(Logout, documents::LOGOUT, NoVariables, LogoutData);
operation!(
    /// Exchange a support-issued impersonation token for a session.
    RedeemImpersonation,
    documents::REDEEM_IMPERSONATION,
    RedeemImpersonationVariables,
    RedeemImpersonationData
);
operation!(
    /// User, cart, wishlist and addresses in one round trip.
    GetUserContext, documents::GET_USER_CONTEXT, UserVariables, GetUserContextData
);
operation!(GetOrders, documents::GET_ORDERS, UserVariables, GetOrdersData);
operation!(
    UpdateUserProfile,
    documents::UPDATE_USER_PROFILE,
    UpdateUserProfileVariables,
    UpdateUserProfileData
);
operation!(
    ChangeUserPassword,
    documents::CHANGE_USER_PASSWORD,
    ChangeUserPasswordVariables,
    ChangeUserPasswordData
);
operation!(CreateOrder, documents::CREATE_ORDER, CreateOrderVariables, CreateOrderData);
operation!(AddAddress, documents::ADD_ADDRESS, AddAddressVariables, AddAddressData);
operation!(GetAddresses, documents::GET_ADDRESSES, UserVariables, GetAddressesData);
operation!(CreatePayment, documents::CREATE_PAYMENT, CreatePaymentVariables, CreatePaymentData);
operation!(GetCmsPage, documents::GET_CMS_PAGE, GetCmsPageVariables, GetCmsPageData);
operation!(GetCmsPages, documents::GET_CMS_PAGES, NoVariables, GetCmsPagesData);
