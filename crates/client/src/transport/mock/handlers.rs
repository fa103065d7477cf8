//! Per-operation fixture responses.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::dataset::MockDataset;
use crate::graphql::{
    AddToCartVariables, GetCmsPageVariables, GetProductDetailVariables, GetProductsVariables,
    LoginVariables, Operation, RegisterVariables, UserProductVariables, UserVariables,
};

/// Answer `operation` from the dataset.
///
/// Returns the response `data` object, or `None` when the operation has no
/// fixture handler.
pub(super) fn respond(dataset: &MockDataset, operation: Operation, variables: &Value) -> Option<Value> {
    let data = match operation {
        Operation::GetProducts => {
            let vars: GetProductsVariables = parse(variables);
            json!({ "getProducts": encode(&dataset.products(&vars)) })
        }
        Operation::GetProductDetail => {
            let vars: GetProductDetailVariables = parse(variables);
            json!({
                "product": encode(&dataset.product(&vars.id)),
                "reviews": encode(&dataset.reviews_for(&vars.id)),
            })
        }
        Operation::GetCategories => json!({ "getCategories": encode(dataset.categories()) }),
        Operation::GetCart => {
            let vars: UserVariables = parse(variables);
            json!({ "getCart": encode(&dataset.cart(&vars.user_id)) })
        }
        Operation::AddToCart => {
            let vars: AddToCartVariables = parse(variables);
            let cart = dataset.add_to_cart(&vars.user_id, &vars.product_id, vars.quantity);
            json!({ "addToCart": encode(&cart) })
        }
        Operation::RemoveFromCart => {
            let vars: UserProductVariables = parse(variables);
            let cart = dataset.remove_from_cart(&vars.user_id, &vars.product_id);
            json!({ "removeFromCart": encode(&cart) })
        }
        Operation::ClearCart => {
            let vars: UserVariables = parse(variables);
            json!({ "clearCart": encode(&dataset.clear_cart(&vars.user_id)) })
        }
        Operation::GetWishlist => {
            let vars: UserVariables = parse(variables);
            json!({ "getWishlist": encode(&dataset.wishlist(&vars.user_id)) })
        }
        Operation::AddToWishlist => {
            let vars: UserProductVariables = parse(variables);
            let wishlist = dataset.add_to_wishlist(&vars.user_id, &vars.product_id);
            json!({ "addToWishlist": encode(&wishlist) })
        }
        Operation::RemoveFromWishlist => {
            let vars: UserProductVariables = parse(variables);
            let wishlist = dataset.remove_from_wishlist(&vars.user_id, &vars.product_id);
            json!({ "removeFromWishlist": encode(&wishlist) })
        }
        Operation::Login => {
            let vars: LoginVariables = parse(variables);
            json!({ "login": encode(&dataset.auth_payload(&vars.email, None)) })
        }
        Operation::Register => {
            let vars: RegisterVariables = parse(variables);
            let payload = dataset.auth_payload(&vars.email, vars.name.as_deref());
            json!({ "register": encode(&payload) })
        }
        Operation::Logout => json!({ "logout": true }),
        Operation::GetUserContext => {
            let vars: UserVariables = parse(variables);
            json!({ "getUserContext": encode(&dataset.user_context(&vars.user_id)) })
        }
        Operation::GetOrders => json!({ "getOrders": [] }),
        Operation::GetAddresses => {
            let vars: UserVariables = parse(variables);
            json!({ "getAddresses": encode(&dataset.addresses(&vars.user_id)) })
        }
        Operation::GetCmsPage => {
            let vars: GetCmsPageVariables = parse(variables);
            json!({ "getCmsPage": encode(&dataset.cms_page(&vars.slug)) })
        }
        Operation::GetCmsPages => json!({ "getCmsPages": encode(dataset.cms_pages()) }),
        Operation::RedeemImpersonation
        | Operation::UpdateUserProfile
        | Operation::ChangeUserPassword
        | Operation::CreateOrder
        | Operation::CreatePayment
        | Operation::AddAddress => return None,
    };
    Some(data)
}

/// Lenient variable decoding: anything unreadable behaves like no filter.
fn parse<T: DeserializeOwned + Default>(variables: &Value) -> T {
    serde_json::from_value(variables.clone()).unwrap_or_default()
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
