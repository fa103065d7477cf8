//! Core types for ShopX.
//!
//! Plain records mirrored from the GraphQL backend. Entities carry no
//! identity beyond their string IDs and are replaced wholesale on each
//! successful fetch.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod cms;
pub mod email;
pub mod id;
pub mod money;
pub mod order;

pub use account::{Address, AuthPayload, ProfileUpdate, User, UserContext, UserRole};
pub use cart::{Cart, CartItem, Wishlist, sum_items};
pub use catalog::{Category, Product, ProductDetail, ProductImage, Review};
pub use cms::{CmsPage, CmsStatus};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{format_price, line_total, round_money};
pub use order::{Order, OrderProductSummary, Payment};
