//! Mock fallback for failed requests.
//!
//! [`MockFallback`] wraps another [`Transport`]. A request is always sent to
//! the inner transport first; only when it fails, and the configured
//! [`MockMode`] covers that failure, is the same operation answered from a
//! [`MockDataset`] instead. Operations without a fixture handler always
//! propagate the original error.

mod dataset;
mod handlers;

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Transport, resolve_operation};
use crate::error::{Result, ShopxError};
use crate::graphql::{GraphQLRequest, Operation};

pub use dataset::{DEMO_USER_EMAIL, DEMO_USER_ID, MockDataset};

/// When failed requests are answered from fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MockMode {
    /// Never substitute.
    #[default]
    Off,
    /// Substitute transport failures (connection, timeout, status, body).
    NetworkErrors,
    /// Substitute transport failures and GraphQL error payloads.
    AnyError,
}

impl MockMode {
    /// Whether `error` may be replaced with fixture data under this mode.
    #[must_use]
    pub const fn covers(self, error: &ShopxError) -> bool {
        match self {
            Self::Off => false,
            Self::NetworkErrors => error.is_transport(),
            Self::AnyError => error.is_transport() || matches!(error, ShopxError::GraphQL(_)),
        }
    }
}

impl FromStr for MockMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "" => Ok(Self::Off),
            "network" => Ok(Self::NetworkErrors),
            "always" => Ok(Self::AnyError),
            other => Err(format!(
                "unknown mock fallback mode '{other}' (expected off, network or always)"
            )),
        }
    }
}

impl std::fmt::Display for MockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::NetworkErrors => "network",
            Self::AnyError => "always",
        })
    }
}

/// Transport decorator that falls back to fixture data.
#[derive(Clone)]
pub struct MockFallback<T> {
    inner: T,
    mode: MockMode,
    state: Arc<FallbackState>,
}

struct FallbackState {
    dataset: MockDataset,
    warned: Mutex<HashSet<Operation>>,
    warnings: AtomicUsize,
}

impl<T> std::fmt::Debug for MockFallback<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFallback")
            .field("mode", &self.mode)
            .field("warnings", &self.state.warnings.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<T: Transport> MockFallback<T> {
    /// Wrap `inner` with the seeded fixture dataset.
    pub fn new(inner: T, mode: MockMode) -> Self {
        Self::with_dataset(inner, mode, MockDataset::new())
    }

    pub fn with_dataset(inner: T, mode: MockMode, dataset: MockDataset) -> Self {
        Self {
            inner,
            mode,
            state: Arc::new(FallbackState {
                dataset,
                warned: Mutex::new(HashSet::new()),
                warnings: AtomicUsize::new(0),
            }),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> MockMode {
        self.mode
    }

    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    #[must_use]
    pub fn dataset(&self) -> &MockDataset {
        &self.state.dataset
    }

    /// Number of one-time fallback warnings logged so far.
    #[must_use]
    pub fn warnings_emitted(&self) -> usize {
        self.state.warnings.load(Ordering::Relaxed)
    }

    fn warn_once(&self, operation: Operation, error: &ShopxError) {
        if self.state.warned.lock().insert(operation) {
            self.state.warnings.fetch_add(1, Ordering::Relaxed);
            warn!(
                operation = %operation,
                error = %error,
                "Request failed, serving mock data for this operation from now on"
            );
        }
    }
}

impl<T: Transport> Transport for MockFallback<T> {
    async fn execute(&self, request: &GraphQLRequest) -> Result<Value> {
        let error = match self.inner.execute(request).await {
            Ok(data) => return Ok(data),
            Err(e) => e,
        };

        if !self.mode.covers(&error) {
            return Err(error);
        }
        let Some(operation) = resolve_operation(request) else {
            debug!("Unresolvable operation, not substituting");
            return Err(error);
        };
        let Some(data) = handlers::respond(&self.state.dataset, operation, &request.variables)
        else {
            debug!(operation = %operation, "No mock handler");
            return Err(error);
        };

        self.warn_once(operation, &error);
        Ok(data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::GraphQLError;
    use crate::graphql::{
        CreateOrder, CreateOrderVariables, GetCategories, GetProducts, GetProductsVariables,
        NoVariables, build_request,
    };

    /// Always fails with a clone of the configured error.
    struct Failing(ShopxError);

    impl Transport for Failing {
        async fn execute(&self, _request: &GraphQLRequest) -> Result<Value> {
            Err(self.0.clone())
        }
    }

    struct Succeeding;

    impl Transport for Succeeding {
        async fn execute(&self, _request: &GraphQLRequest) -> Result<Value> {
            Ok(json!({"getCategories": []}))
        }
    }

    fn network_error() -> ShopxError {
        ShopxError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }
    }

    fn graphql_error() -> ShopxError {
        ShopxError::GraphQL(vec![GraphQLError::message("boom")])
    }

    fn categories() -> GraphQLRequest {
        build_request::<GetCategories>(NoVariables {}).unwrap()
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("off".parse::<MockMode>().unwrap(), MockMode::Off);
        assert_eq!("Network".parse::<MockMode>().unwrap(), MockMode::NetworkErrors);
        assert_eq!("always".parse::<MockMode>().unwrap(), MockMode::AnyError);
        assert!("sometimes".parse::<MockMode>().is_err());
        assert_eq!(MockMode::AnyError.to_string(), "always");
    }

    #[test]
    fn test_mode_coverage() {
        let validation = ShopxError::validation("empty");
        assert!(!MockMode::Off.covers(&network_error()));
        assert!(MockMode::NetworkErrors.covers(&network_error()));
        assert!(!MockMode::NetworkErrors.covers(&graphql_error()));
        assert!(MockMode::AnyError.covers(&graphql_error()));
        assert!(!MockMode::AnyError.covers(&validation));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let transport = MockFallback::new(Succeeding, MockMode::AnyError);
        let data = transport.execute(&categories()).await.unwrap();
        assert_eq!(data, json!({"getCategories": []}));
        assert_eq!(transport.warnings_emitted(), 0);
    }

    #[tokio::test]
    async fn test_off_propagates() {
        let transport = MockFallback::new(Failing(network_error()), MockMode::Off);
        let err = transport.execute(&categories()).await.unwrap_err();
        assert!(matches!(err, ShopxError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_network_mode_keeps_graphql_errors() {
        let transport = MockFallback::new(Failing(graphql_error()), MockMode::NetworkErrors);
        let err = transport.execute(&categories()).await.unwrap_err();
        assert!(matches!(err, ShopxError::GraphQL(_)));
    }

    #[tokio::test]
    async fn test_substitutes_and_warns_once() {
        let transport = MockFallback::new(Failing(network_error()), MockMode::NetworkErrors);
        let request = build_request::<GetProducts>(GetProductsVariables {
            category_id: Some("cat-electronics".into()),
            ..GetProductsVariables::default()
        })
        .unwrap();

        let first = transport.execute(&request).await.unwrap();
        for _ in 0..4 {
            assert_eq!(transport.execute(&request).await.unwrap(), first);
        }
        assert_eq!(first["getProducts"].as_array().map(Vec::len), Some(2));
        assert_eq!(transport.warnings_emitted(), 1);

        transport.execute(&categories()).await.unwrap();
        assert_eq!(transport.warnings_emitted(), 2);
    }

    #[tokio::test]
    async fn test_debug_reports_mode_and_warning_count() {
        let transport = MockFallback::new(Failing(network_error()), MockMode::NetworkErrors);
        assert_eq!(
            format!("{transport:?}"),
            "MockFallback { mode: NetworkErrors, warnings: 0, .. }"
        );

        transport.execute(&categories()).await.unwrap();
        assert!(format!("{transport:?}").contains("warnings: 1"));
    }

    #[tokio::test]
    async fn test_unhandled_operation_propagates_original_error() {
        let transport = MockFallback::new(Failing(network_error()), MockMode::AnyError);
        let request = build_request::<CreateOrder>(CreateOrderVariables::default()).unwrap();
        let err = transport.execute(&request).await.unwrap_err();
        assert!(matches!(err, ShopxError::Status { status: 502, ref body } if body == "bad gateway"));
        assert_eq!(transport.warnings_emitted(), 0);
    }
}
