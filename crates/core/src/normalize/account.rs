use serde_json::Value;

use crate::types::{
    Address, AddressId, AuthPayload, Cart, ProfileUpdate, User, UserContext, UserId, UserRole,
    Wishlist,
};

use super::{
    coerce_optional_string, coerce_string, field, is_record, list, normalize_cart,
    normalize_wishlist,
};

/// Normalize a user. Null or non-object payloads yield `None`.
#[must_use]
pub fn normalize_user(value: &Value) -> Option<User> {
    is_record(value).then(|| User {
        id: UserId::from(coerce_string(field(value, "id"))),
        email: coerce_string(field(value, "email")),
        name: coerce_optional_string(field(value, "name")),
        role: UserRole::from_wire(&coerce_string(field(value, "role"))),
    })
}

/// Normalize an auth payload. Requires a user record to be present.
#[must_use]
pub fn normalize_auth_payload(value: &Value) -> Option<AuthPayload> {
    let user = normalize_user(field(value, "user"))?;
    Some(AuthPayload {
        token: coerce_string(field(value, "token")),
        user,
    })
}

/// Normalize an address record.
#[must_use]
pub fn normalize_address(value: &Value) -> Address {
    Address {
        id: AddressId::from(coerce_string(field(value, "id"))),
        user_id: UserId::from(coerce_string(field(value, "userId"))),
        street: coerce_string(field(value, "street")),
        city: coerce_string(field(value, "city")),
        postal_code: coerce_string(field(value, "postalCode")),
        country: coerce_string(field(value, "country")),
    }
}

/// Normalize a list of addresses.
#[must_use]
pub fn normalize_addresses(value: &Value) -> Vec<Address> {
    list(value).iter().map(normalize_address).collect()
}

/// Normalize the aggregate user context.
///
/// Returns `None` when the payload or its `user` is missing. A missing cart
/// or wishlist normalizes to an empty one.
#[must_use]
pub fn normalize_user_context(value: &Value) -> Option<UserContext> {
    let user = normalize_user(field(value, "user"))?;

    let cart = field(value, "cart");
    let cart = if is_record(cart) {
        normalize_cart(cart)
    } else {
        Cart::default()
    };

    let wishlist = field(value, "wishlist");
    let wishlist = if wishlist.is_null() {
        Wishlist::default()
    } else {
        normalize_wishlist(wishlist)
    };

    Some(UserContext {
        user,
        cart,
        wishlist,
        addresses: normalize_addresses(field(value, "addresses")),
    })
}

/// Normalize the `updateUserProfile` result.
#[must_use]
pub fn normalize_profile_update(value: &Value) -> ProfileUpdate {
    ProfileUpdate {
        user: normalize_user(field(value, "user")),
        message: coerce_optional_string(field(value, "message")),
    }
}
