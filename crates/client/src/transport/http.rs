//! HTTP transport for the ShopX GraphQL endpoint.

use std::sync::Arc;

use graphql_client::Response;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::{Transport, resolve_operation};
use crate::config::ShopxConfig;
use crate::error::{Result, ShopxError};
use crate::graphql::GraphQLRequest;
use crate::store::Store;

/// Header carrying the server-side services token in proxy mode.
pub const SERVICES_TOKEN_HEADER: &str = "x-shopx-services-token";

/// Posts GraphQL requests to the configured endpoint.
///
/// The bearer token is read from the session slice on every request, so a
/// login or logout takes effect immediately. Cheap to clone.
#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<HttpTransportInner>,
}

struct HttpTransportInner {
    client: Client,
    endpoint: String,
    services_token: Option<SecretString>,
    store: Store,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.inner.endpoint)
            .field(
                "services_token",
                &self.inner.services_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport for the effective endpoint of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ShopxConfig, store: Store) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            inner: Arc::new(HttpTransportInner {
                client,
                endpoint: config.effective_endpoint(),
                services_token: config.services_token().map(SecretString::from),
                store,
            }),
        })
    }

    /// The URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(operation = request.operation_name))]
    async fn execute(&self, request: &GraphQLRequest) -> Result<Value> {
        let mut builder = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(token) = self.inner.store.bearer_token() {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(token) = &self.inner.services_token {
            builder = builder.header(SERVICES_TOKEN_HEADER, token.expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();

        // Read as text first for better diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "GraphQL endpoint returned non-success status"
            );
            return Err(ShopxError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let response: Response<Value> = match serde_json::from_str(&body) {
            Ok(r) => r,
            Err(e) => {
                error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse GraphQL response"
                );
                return Err(e.into());
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(count = errors.len(), "GraphQL errors in response");
            return Err(ShopxError::GraphQL(
                errors.into_iter().map(Into::into).collect(),
            ));
        }

        match response.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(resolve_operation(request).map_or_else(
                || ShopxError::Internal("response carried no data".to_string()),
                ShopxError::MissingData,
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use shopx_core::{AuthPayload, User, UserId};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::graphql::{GetCategories, NoVariables, build_request};
    use crate::store::SessionAction;

    /// Serve exactly one canned response and hand back the raw request.
    async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }
            let reply = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (format!("http://{addr}/graphql"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..split]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= split + 4 + length
    }

    fn config_for(endpoint: &str) -> ShopxConfig {
        ShopxConfig {
            graphql_endpoint: endpoint.parse().unwrap(),
            ..ShopxConfig::default()
        }
    }

    fn categories_request() -> GraphQLRequest {
        build_request::<GetCategories>(NoVariables {}).unwrap()
    }

    #[tokio::test]
    async fn test_returns_data_and_sends_bearer() {
        let (endpoint, server) = serve_once(
            "200 OK",
            json!({"data": {"getCategories": [{"id": "c1", "name": "Audio"}]}}).to_string(),
        )
        .await;

        let store = Store::in_memory();
        store.dispatch(SessionAction::Set(AuthPayload {
            token: "tok-abc".to_string(),
            user: User {
                id: UserId::from("u1"),
                ..User::default()
            },
        }));
        let transport = HttpTransport::new(&config_for(&endpoint), store).unwrap();

        let data = transport.execute(&categories_request()).await.unwrap();
        assert_eq!(data["getCategories"][0]["id"], "c1");

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("post /graphql"));
        assert!(raw.contains("authorization: bearer tok-abc"));
        assert!(raw.contains("\"operationname\":\"getcategories\""));
        assert!(!raw.contains(SERVICES_TOKEN_HEADER));
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let (endpoint, server) = serve_once("503 Service Unavailable", "down".to_string()).await;
        let transport = HttpTransport::new(&config_for(&endpoint), Store::in_memory()).unwrap();

        let err = transport.execute(&categories_request()).await.unwrap_err();
        assert!(matches!(err, ShopxError::Status { status: 503, ref body } if body == "down"));
        assert!(err.is_transport());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_graphql_errors_are_not_transport_errors() {
        let (endpoint, server) = serve_once(
            "200 OK",
            json!({"data": null, "errors": [{"message": "boom"}]}).to_string(),
        )
        .await;
        let transport = HttpTransport::new(&config_for(&endpoint), Store::in_memory()).unwrap();

        let err = transport.execute(&categories_request()).await.unwrap_err();
        assert!(matches!(err, ShopxError::GraphQL(ref errors) if errors[0].message == "boom"));
        assert!(!err.is_transport());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_body_is_parse_error() {
        let (endpoint, server) = serve_once("200 OK", "<html>".to_string()).await;
        let transport = HttpTransport::new(&config_for(&endpoint), Store::in_memory()).unwrap();

        let err = transport.execute(&categories_request()).await.unwrap_err();
        assert!(matches!(err, ShopxError::Parse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_data_names_operation() {
        let (endpoint, server) = serve_once("200 OK", "{}".to_string()).await;
        let transport = HttpTransport::new(&config_for(&endpoint), Store::in_memory()).unwrap();

        let err = transport.execute(&categories_request()).await.unwrap_err();
        assert!(matches!(
            err,
            ShopxError::MissingData(crate::graphql::Operation::GetCategories)
        ));
        server.await.unwrap();
    }

    #[test]
    fn test_debug_redacts_services_token() {
        let config = ShopxConfig {
            use_server_services: true,
            server_services_token: Some(SecretString::from("k8F2qL9xZr4Tm7Wv")),
            ..ShopxConfig::default()
        };
        let transport = HttpTransport::new(&config, Store::in_memory()).unwrap();
        let debug = format!("{transport:?}");
        assert!(!debug.contains("k8F2qL9xZr4Tm7Wv"));
        assert!(transport.endpoint().ends_with("/api/serverSideServices/graphql"));
    }
}
