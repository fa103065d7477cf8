//! Error taxonomy for the client data layer.
//!
//! Three families of failure reach callers:
//!
//! - validation errors, raised before any request is issued
//! - transport errors (connection, timeout, non-2xx status, undecodable body)
//! - server-reported GraphQL errors
//!
//! The mock fallback only ever substitutes the last two. `ShopxError` is
//! `Clone` so a single failed load can be handed to every caller that was
//! waiting on the same deduplicated request.

use std::sync::Arc;

use thiserror::Error;

use crate::graphql::Operation;

/// Errors produced by the ShopX client.
#[derive(Debug, Clone, Error)]
pub enum ShopxError {
    /// HTTP request failed (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(Arc<reqwest::Error>),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// GraphQL response carried errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(Arc<serde_json::Error>),

    /// Input rejected before a request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response had neither data nor errors for the operation.
    #[error("No data in response for {0}")]
    MissingData(Operation),

    /// User-scoped query issued before persisted state was restored.
    #[error("Store has not been rehydrated yet")]
    NotHydrated,

    /// Reading or writing persisted state failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopxError {
    /// Whether this is a transport-level failure rather than a server-reported
    /// GraphQL error or a local one.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Parse(_))
    }

    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<reqwest::Error> for ShopxError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for ShopxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(Arc::new(err))
    }
}

impl From<std::io::Error> for ShopxError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ShopxError>;

/// A GraphQL error returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the document.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the failing field.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL document where an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl GraphQLError {
    /// Error with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
