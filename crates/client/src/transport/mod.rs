//! Request transports.
//!
//! A [`Transport`] takes a GraphQL request envelope and yields the `data`
//! object of a successful response. GraphQL error payloads surface as
//! [`ShopxError::GraphQL`]; everything else that goes wrong on the wire is a
//! transport error (see [`ShopxError::is_transport`]).
//!
//! - [`HttpTransport`] talks to the configured endpoint with `reqwest`.
//! - [`MockFallback`] wraps any transport and answers from fixture data when
//!   the inner call fails and the configured [`MockMode`] allows it.

mod http;
pub mod mock;

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::graphql::{GraphQLRequest, Operation};

pub use http::HttpTransport;
pub use mock::{MockDataset, MockFallback, MockMode};

/// Executes GraphQL requests.
pub trait Transport: Send + Sync + 'static {
    /// Execute a request, returning the response's `data` object.
    fn execute(&self, request: &GraphQLRequest) -> impl Future<Output = Result<Value>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(&self, request: &GraphQLRequest) -> impl Future<Output = Result<Value>> + Send {
        (**self).execute(request)
    }
}

/// Resolve the operation a request is for.
///
/// Prefers `operationName`; falls back to the first named operation in the
/// document.
#[must_use]
pub fn resolve_operation(request: &GraphQLRequest) -> Option<Operation> {
    Operation::from_name(request.operation_name).or_else(|| Operation::from_document(request.query))
}

#[cfg(test)]
mod tests {
    use graphql_client::QueryBody;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_by_operation_name() {
        let request = QueryBody {
            variables: json!({}),
            query: "query Something { x }",
            operation_name: "GetCategories",
        };
        assert_eq!(resolve_operation(&request), Some(Operation::GetCategories));
    }

    #[test]
    fn test_resolve_falls_back_to_document() {
        let request = QueryBody {
            variables: json!({}),
            query: "query GetCmsPages { getCmsPages { id } }",
            operation_name: "",
        };
        assert_eq!(resolve_operation(&request), Some(Operation::GetCmsPages));

        let anonymous = QueryBody {
            variables: json!({}),
            query: "{ getCmsPages { id } }",
            operation_name: "",
        };
        assert_eq!(resolve_operation(&anonymous), None);
    }
}
