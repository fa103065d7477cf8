//! Account entities: users, auth payloads, addresses and the aggregate
//! user context fetched at startup.

use serde::{Deserialize, Serialize};

use super::cart::{Cart, Wishlist};
use super::id::{AddressId, UserId};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Support,
}

impl UserRole {
    /// Parse the wire representation. Unknown roles fall back to `Customer`.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("SUPPORT") {
            Self::Support
        } else {
            Self::Customer
        }
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
}

/// Result of `login` and `redeemImpersonation`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

impl std::fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPayload")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// A shipping address. Every field is required by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Everything the client needs after sign-in, fetched in one round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user: User,
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub addresses: Vec<Address>,
}

/// Result of `updateUserProfile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub user: Option<User>,
    pub message: Option<String>,
}
