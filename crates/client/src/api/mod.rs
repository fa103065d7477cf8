//! The ShopX endpoint surface.
//!
//! Every operation is declared once as either a [`CachedQuery`] or a
//! [`Mutation`]:
//!
//! - queries are cached by operation and variables, provide invalidation
//!   tags, and may write their result into a store slice when loaded;
//! - mutations always hit the transport, may write into the store, and
//!   invalidate tags afterwards. Invalidated queries with an active
//!   subscriber are refetched immediately.
//!
//! [`ShopxApi`] ties transport, cache and store together and exposes one
//! method per operation, grouped by domain in the submodules.

mod account;
mod cart;
mod catalog;
mod checkout;
mod cms;
mod wishlist;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::{CacheValue, QueryCache, QueryKey, QuerySubscription, Tag};
use crate::error::{Result, ShopxError};
use crate::graphql::{self, Operation, ShopxOperation};
use crate::store::Store;
use crate::transport::Transport;

/// A cached read operation.
pub trait CachedQuery: ShopxOperation {
    /// Normalized result.
    type Output: Clone + Send + Sync + 'static;

    /// Whether the query is scoped to the signed-in user and so must wait
    /// for persisted state to be restored.
    const USER_SCOPED: bool = false;

    fn normalize(data: Self::ResponseData) -> Self::Output;

    fn provides(output: &Self::Output) -> Vec<Tag>;

    fn into_cache(output: Self::Output) -> CacheValue;

    fn from_cache(value: CacheValue) -> Option<Self::Output>;

    /// Store side effect, run once per completed load.
    fn on_success(_store: &Store, _output: &Self::Output) {}
}

/// A write operation.
pub trait Mutation: ShopxOperation {
    type Output: Send;

    /// # Errors
    ///
    /// Returns an error if the response lacks a required part.
    fn normalize(data: Self::ResponseData) -> Result<Self::Output>;

    /// Tags invalidated after a successful call.
    fn invalidates() -> Vec<Tag>;

    fn on_success(_store: &Store, _output: &Self::Output) {}
}

/// Client for the ShopX GraphQL API. Cheap to clone.
pub struct ShopxApi<T> {
    inner: Arc<ApiInner<T>>,
}

struct ApiInner<T> {
    transport: T,
    cache: QueryCache,
    store: Store,
}

impl<T> Clone for ShopxApi<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ShopxApi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopxApi")
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ShopxApi<T> {
    #[must_use]
    pub fn new(transport: T, store: Store, cache: QueryCache) -> Self {
        Self {
            inner: Arc::new(ApiInner {
                transport,
                cache,
                store,
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Run a cached query.
    ///
    /// The store side effect is skipped when the signed-in user changes
    /// while the request is in flight; the result is still cached and
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ShopxError::NotHydrated`] for user-scoped queries issued
    /// before rehydration, otherwise any transport or decoding error.
    pub async fn query<Q: CachedQuery>(&self, variables: Q::Variables) -> Result<Q::Output> {
        if Q::USER_SCOPED && !self.store().is_hydrated() {
            return Err(ShopxError::NotHydrated);
        }

        let request = graphql::build_request::<Q>(variables)?;
        let key = QueryKey::new(Q::OPERATION, &request.variables);

        let value = self
            .cache()
            .get_or_load(&key, async {
                let started_as = self.store().current_user_id();
                let data = self.transport().execute(&request).await?;
                let data: Q::ResponseData = serde_json::from_value(data)?;
                let output = Q::normalize(data);
                if self.store().current_user_id() == started_as {
                    Q::on_success(self.store(), &output);
                } else {
                    debug!(key = %key, "Signed-in user changed during load, store left untouched");
                }
                let tags = Q::provides(&output);
                Ok((Q::into_cache(output), tags))
            })
            .await?;

        Q::from_cache(value)
            .ok_or_else(|| ShopxError::Internal(format!("cached value for {key} has the wrong shape")))
    }

    /// Subscribe to a query's cache entry.
    ///
    /// While the guard is alive, mutations that invalidate the entry refetch
    /// it immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the variables cannot be serialized.
    pub fn subscribe<Q: CachedQuery>(&self, variables: Q::Variables) -> Result<QuerySubscription> {
        let request = graphql::build_request::<Q>(variables)?;
        Ok(self
            .cache()
            .subscribe(QueryKey::new(Q::OPERATION, &request.variables)))
    }

    /// Run a mutation, apply its side effect and invalidate its tags.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error. Nothing is invalidated on
    /// failure.
    pub async fn mutate<M: Mutation>(&self, variables: M::Variables) -> Result<M::Output> {
        let request = graphql::build_request::<M>(variables)?;
        let data = self.transport().execute(&request).await?;
        let data: M::ResponseData = serde_json::from_value(data)?;
        let output = M::normalize(data)?;

        M::on_success(self.store(), &output);
        self.invalidate(&M::invalidates()).await;
        Ok(output)
    }

    /// Invalidate `tags` and refetch affected queries that have subscribers.
    ///
    /// Returns the invalidated keys.
    pub async fn invalidate(&self, tags: &[Tag]) -> Vec<QueryKey> {
        let keys = self.cache().invalidate_tags(tags).await;
        for key in &keys {
            if self.cache().subscriber_count(key) == 0 {
                continue;
            }
            debug!(key = %key, "Refetching subscribed query");
            if let Err(e) = self.refetch(key).await {
                warn!(key = %key, error = %e, "Refetch of subscribed query failed");
            }
        }
        keys
    }

    /// Re-issue the query behind `key`.
    async fn refetch(&self, key: &QueryKey) -> Result<()> {
        match key.operation() {
            Operation::GetProducts => self.refetch_as::<graphql::GetProducts>(key).await,
            Operation::GetProductDetail => {
                self.refetch_as::<graphql::GetProductDetail>(key).await
            }
            Operation::GetCategories => self.refetch_as::<graphql::GetCategories>(key).await,
            Operation::GetCart => self.refetch_as::<graphql::GetCart>(key).await,
            Operation::GetWishlist => self.refetch_as::<graphql::GetWishlist>(key).await,
            Operation::GetUserContext => self.refetch_as::<graphql::GetUserContext>(key).await,
            Operation::GetOrders => self.refetch_as::<graphql::GetOrders>(key).await,
            Operation::GetAddresses => self.refetch_as::<graphql::GetAddresses>(key).await,
            Operation::GetCmsPage => self.refetch_as::<graphql::GetCmsPage>(key).await,
            Operation::GetCmsPages => self.refetch_as::<graphql::GetCmsPages>(key).await,
            Operation::AddToCart
            | Operation::RemoveFromCart
            | Operation::ClearCart
            | Operation::AddToWishlist
            | Operation::RemoveFromWishlist
            | Operation::Register
            | Operation::Login
            | Operation::Logout
            | Operation::RedeemImpersonation
            | Operation::UpdateUserProfile
            | Operation::ChangeUserPassword
            | Operation::CreateOrder
            | Operation::AddAddress
            | Operation::CreatePayment => Err(ShopxError::Internal(format!(
                "{} is not a cached query",
                key.operation()
            ))),
        }
    }

    async fn refetch_as<Q>(&self, key: &QueryKey) -> Result<()>
    where
        Q: CachedQuery,
        Q::Variables: DeserializeOwned,
    {
        let variables: Q::Variables = serde_json::from_str(key.variables())?;
        self.query::<Q>(variables).await.map(drop)
    }
}

/// Shorthand for the missing-part error of a mutation response.
fn missing<M: ShopxOperation>() -> ShopxError {
    ShopxError::MissingData(M::OPERATION)
}
