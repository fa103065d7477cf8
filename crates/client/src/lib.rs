//! ShopX client data layer.
//!
//! Keeps a local, persisted view of the signed-in user's session, cart,
//! wishlist, orders and UI preferences in sync with the ShopX GraphQL
//! backend.
//!
//! # Modules
//!
//! - [`api`] - One method per backend operation, with caching and
//!   tag-based invalidation
//! - [`cache`] - Query cache keyed by operation and variables
//! - [`store`] - Reactive slices and their persistence
//! - [`transport`] - HTTP transport and the mock fallback
//! - [`graphql`] - Typed operation documents
//! - [`state`] - Application state built once at startup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod graphql;
pub mod state;
pub mod store;
pub mod transport;

pub use api::{CachedQuery, Mutation, ShopxApi};
pub use cache::{QueryCache, QueryKey, QueryStatus, QuerySubscription, Tag, TagId, TagKind};
pub use config::{ConfigError, ShopxConfig};
pub use error::{GraphQLError, Result, ShopxError};
pub use state::{AppState, ClientTransport};
pub use store::{Store, StoreState};
pub use transport::{HttpTransport, MockDataset, MockFallback, MockMode, Transport};
