//! Closed set of operations the client knows how to issue.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static OPERATION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:query|mutation)\s+([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex")
});

/// Every GraphQL operation exposed by the ShopX API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    GetProducts,
    GetProductDetail,
    GetCategories,
    GetCart,
    AddToCart,
    RemoveFromCart,
    ClearCart,
    GetWishlist,
    AddToWishlist,
    RemoveFromWishlist,
    Register,
    Login,
    Logout,
    RedeemImpersonation,
    GetUserContext,
    GetOrders,
    UpdateUserProfile,
    ChangeUserPassword,
    CreateOrder,
    AddAddress,
    GetAddresses,
    CreatePayment,
    GetCmsPage,
    GetCmsPages,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Self; 24] = [
        Self::GetProducts,
        Self::GetProductDetail,
        Self::GetCategories,
        Self::GetCart,
        Self::AddToCart,
        Self::RemoveFromCart,
        Self::ClearCart,
        Self::GetWishlist,
        Self::AddToWishlist,
        Self::RemoveFromWishlist,
        Self::Register,
        Self::Login,
        Self::Logout,
        Self::RedeemImpersonation,
        Self::GetUserContext,
        Self::GetOrders,
        Self::UpdateUserProfile,
        Self::ChangeUserPassword,
        Self::CreateOrder,
        Self::AddAddress,
        Self::GetAddresses,
        Self::CreatePayment,
        Self::GetCmsPage,
        Self::GetCmsPages,
    ];

    /// The GraphQL operation name as sent in `operationName`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetProducts => "GetProducts",
            Self::GetProductDetail => "GetProductDetail",
            Self::GetCategories => "GetCategories",
            Self::GetCart => "GetCart",
            Self::AddToCart => "AddToCart",
            Self::RemoveFromCart => "RemoveFromCart",
            Self::ClearCart => "ClearCart",
            Self::GetWishlist => "GetWishlist",
            Self::AddToWishlist => "AddToWishlist",
            Self::RemoveFromWishlist => "RemoveFromWishlist",
            Self::Register => "Register",
            Self::Login => "Login",
            Self::Logout => "Logout",
            Self::RedeemImpersonation => "RedeemImpersonation",
            Self::GetUserContext => "GetUserContext",
            Self::GetOrders => "GetOrders",
            Self::UpdateUserProfile => "UpdateUserProfile",
            Self::ChangeUserPassword => "ChangeUserPassword",
            Self::CreateOrder => "CreateOrder",
            Self::AddAddress => "AddAddress",
            Self::GetAddresses => "GetAddresses",
            Self::CreatePayment => "CreatePayment",
            Self::GetCmsPage => "GetCmsPage",
            Self::GetCmsPages => "GetCmsPages",
        }
    }

    /// Look up an operation by its GraphQL name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Resolve the first named `query`/`mutation` in a document.
    #[must_use]
    pub fn from_document(document: &str) -> Option<Self> {
        OPERATION_NAME_RE
            .captures(document)
            .and_then(|caps| caps.get(1))
            .and_then(|m| Self::from_name(m.as_str()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("getProducts"), None);
    }

    #[test]
    fn test_from_document() {
        assert_eq!(
            Operation::from_document("query GetCart($userId: ID!) { getCart(userId: $userId) { total } }"),
            Some(Operation::GetCart)
        );
        assert_eq!(
            Operation::from_document("\n  mutation Logout {\n logout\n }"),
            Some(Operation::Logout)
        );
        assert_eq!(Operation::from_document("query Unknown { x }"), None);
        assert_eq!(Operation::from_document("{ getCategories { id } }"), None);
    }
}
