//! Query cache with tag-based invalidation.
//!
//! Results are cached in `moka` keyed by operation and canonical variables.
//! Concurrent loads of the same key are coalesced by
//! [`moka::future::Cache::try_get_with`], so identical in-flight requests
//! reach the transport once and every waiter receives the same result.
//!
//! Each cached entry records the [`Tag`]s it provides. Invalidating a tag
//! evicts every entry providing it and reports the affected keys so the
//! caller can refetch the ones with live [`QuerySubscription`]s.

mod subscription;
mod tags;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use parking_lot::Mutex;
use serde_json::Value;
use shopx_core::{
    Address, Cart, Category, CmsPage, Order, Product, ProductDetail, UserContext, Wishlist,
};
use tracing::debug;

use crate::error::{Result, ShopxError};
use crate::graphql::Operation;

pub use subscription::{QueryStatus, QuerySubscription};
pub use tags::{Tag, TagId, TagKind};

use subscription::Registry;
use tags::TagIndex;

/// Identity of a cached query: operation plus canonical JSON variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    operation: Operation,
    variables: String,
}

impl QueryKey {
    /// Key for `operation` with `variables`. Object keys are sorted, so
    /// field order does not matter.
    #[must_use]
    pub fn new(operation: Operation, variables: &Value) -> Self {
        Self {
            operation,
            variables: canonical_json(variables),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn variables(&self) -> &str {
        &self.variables
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.variables)
    }
}

fn canonical_json(value: &Value) -> String {
    fn write(value: &Value, out: &mut String) {
        match value {
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                out.push('{');
                for (i, (k, v)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&Value::String(k.clone()).to_string());
                    out.push(':');
                    write(v, out);
                }
                out.push('}');
            }
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write(item, out);
                }
                out.push(']');
            }
            scalar => out.push_str(&scalar.to_string()),
        }
    }

    let mut out = String::new();
    write(value, &mut out);
    out
}

/// Cached query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    Products(Vec<Product>),
    ProductDetail(Box<ProductDetail>),
    Categories(Vec<Category>),
    Cart(Cart),
    Wishlist(Wishlist),
    UserContext(Option<Box<UserContext>>),
    Orders(Vec<Order>),
    Addresses(Vec<Address>),
    CmsPage(Option<CmsPage>),
    CmsPages(Vec<CmsPage>),
}

/// Shared query cache. Cheap to clone.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<QueryCacheInner>,
}

struct QueryCacheInner {
    entries: Cache<QueryKey, CacheValue>,
    tags: Mutex<TagIndex>,
    subscriptions: Arc<Registry>,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.entry_count())
            .field("tagged", &self.inner.tags.lock().len())
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    /// Cache holding up to `capacity` results for `ttl` each.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(QueryCacheInner {
                entries,
                tags: Mutex::new(TagIndex::default()),
                subscriptions: Arc::new(Registry::default()),
            }),
        }
    }

    /// Cached value for `key`, if present.
    pub async fn get(&self, key: &QueryKey) -> Option<CacheValue> {
        self.inner.entries.get(key).await
    }

    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.inner.entries.contains_key(key)
    }

    /// Return the cached value for `key`, or run `load` to produce it.
    ///
    /// `load` yields the value and the tags it provides. Concurrent calls for
    /// the same key share one `load`. Failures are not cached; every waiter
    /// receives a clone of the error.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `load`.
    pub async fn get_or_load<F>(&self, key: &QueryKey, load: F) -> Result<CacheValue>
    where
        F: Future<Output = Result<(CacheValue, Vec<Tag>)>>,
    {
        if let Some(value) = self.inner.entries.get(key).await {
            debug!(key = %key, "Cache hit");
            return Ok(value);
        }

        let init = async {
            self.inner.subscriptions.set_status(key, QueryStatus::Pending);
            let (value, tags) = load.await?;
            self.inner.tags.lock().insert(key.clone(), tags);
            Ok::<_, ShopxError>(value)
        };

        match self.inner.entries.try_get_with(key.clone(), init).await {
            Ok(value) => {
                self.inner
                    .subscriptions
                    .set_status(key, QueryStatus::Fulfilled);
                Ok(value)
            }
            Err(error) => {
                let error = ShopxError::clone(&error);
                self.inner
                    .subscriptions
                    .set_status(key, QueryStatus::Rejected(error.to_string()));
                Err(error)
            }
        }
    }

    /// Store a value directly, replacing any cached entry.
    pub async fn insert(&self, key: QueryKey, value: CacheValue, tags: Vec<Tag>) {
        self.inner.tags.lock().insert(key.clone(), tags);
        self.inner.entries.insert(key.clone(), value).await;
        self.inner
            .subscriptions
            .set_status(&key, QueryStatus::Fulfilled);
    }

    /// Evict every entry providing any of `tags` and return their keys,
    /// sorted.
    pub async fn invalidate_tags(&self, tags: &[Tag]) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.inner.tags.lock().take_matching(tags).into_iter().collect();
        keys.sort();
        for key in &keys {
            self.inner.entries.invalidate(key).await;
        }
        if !keys.is_empty() {
            debug!(
                tags = %tags.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
                count = keys.len(),
                "Invalidated cached queries"
            );
        }
        keys
    }

    /// Drop every cached entry.
    pub async fn invalidate_all(&self) {
        self.inner.tags.lock().clear();
        self.inner.entries.invalidate_all();
        self.inner.entries.run_pending_tasks().await;
    }

    /// Subscribe to `key`. The guard starts as `Fulfilled` when a value is
    /// already cached.
    #[must_use]
    pub fn subscribe(&self, key: QueryKey) -> QuerySubscription {
        let initial = if self.contains(&key) {
            QueryStatus::Fulfilled
        } else {
            QueryStatus::Uninitialized
        };
        self.inner.subscriptions.subscribe(key, initial)
    }

    #[must_use]
    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.inner.subscriptions.subscriber_count(key)
    }

    /// Tags currently recorded for `key`.
    #[must_use]
    pub fn tags_for(&self, key: &QueryKey) -> Vec<Tag> {
        self.inner
            .tags
            .lock()
            .tags_for(key)
            .map(<[Tag]>::to_vec)
            .unwrap_or_default()
    }
}
