//! End-to-end tests for the ShopX client data layer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopx-integration-tests
//! ```
//!
//! No network is required: tests inject one of the transports below through
//! the [`Transport`] trait.
//!
//! - [`FailingTransport`] - every call fails with a transport error
//! - [`ScriptedTransport`] - canned responses per operation plus call counters

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use shopx_client::graphql::{GraphQLRequest, Operation};
use shopx_client::store::KeyValueStorage;
use shopx_client::transport::resolve_operation;
use shopx_client::{QueryCache, Result, ShopxApi, ShopxError, Store, Transport};

/// Always fails with `503 Service Unavailable`.
#[derive(Debug, Default)]
pub struct FailingTransport {
    calls: AtomicUsize,
}

impl FailingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The error every call returns.
    #[must_use]
    pub fn error() -> ShopxError {
        ShopxError::Status {
            status: 503,
            body: "upstream unavailable".to_string(),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for FailingTransport {
    async fn execute(&self, _request: &GraphQLRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Self::error())
    }
}

/// Answers each operation with a configured result. Unscripted operations
/// fail like [`FailingTransport`].
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<Operation, Result<Value>>>,
    calls: Mutex<HashMap<Operation, usize>>,
    requests: Mutex<Vec<(Operation, Value)>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, operation: Operation, response: Result<Value>) -> Self {
        self.set(operation, response);
        self
    }

    pub fn set(&self, operation: Operation, response: Result<Value>) {
        self.responses.lock().insert(operation, response);
    }

    #[must_use]
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls.lock().get(&operation).copied().unwrap_or(0)
    }

    /// Variables sent with each request, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<(Operation, Value)> {
        self.requests.lock().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, request: &GraphQLRequest) -> Result<Value> {
        let operation = resolve_operation(request)
            .ok_or_else(|| ShopxError::Internal("unresolvable operation".to_string()))?;
        *self.calls.lock().entry(operation).or_default() += 1;
        self.requests
            .lock()
            .push((operation, request.variables.clone()));
        self.responses
            .lock()
            .get(&operation)
            .cloned()
            .unwrap_or_else(|| Err(FailingTransport::error()))
    }
}

/// An API over `transport` with a fresh cache and a rehydrated store.
pub fn hydrated_api<T: Transport>(transport: T) -> ShopxApi<T> {
    api_with_storage(transport, shopx_client::store::MemoryStorage::new())
}

/// An API over `transport` whose store is rehydrated from `storage`.
pub fn api_with_storage<T: Transport>(
    transport: T,
    storage: impl KeyValueStorage + 'static,
) -> ShopxApi<T> {
    let store = Store::new(storage);
    store.rehydrate();
    ShopxApi::new(transport, store, QueryCache::new(100, Duration::from_secs(60)))
}
