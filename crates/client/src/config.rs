//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPX_GRAPHQL_ENDPOINT` - GraphQL URL (default: `http://localhost:4000/graphql`)
//! - `SHOPX_IMAGE_CDN_URL` - Base URL for relative image paths
//! - `SHOPX_SITE_NAME` - Display name (default: `ShopX`)
//! - `SHOPX_USE_SERVER_SERVICES` - Route requests through the server-side proxy
//! - `SHOPX_SERVER_SERVICES_BASE_PATH` - Proxy path (default: `/api/serverSideServices`)
//! - `SHOPX_SERVER_SERVICES_TOKEN` - Static token sent to the proxy
//! - `SHOPX_MOCK_FALLBACK` - `off`, `network` or `always` (default: `off`)
//! - `SHOPX_CACHE_TTL_SECS` - How long unused query results are kept (default: 60)
//! - `SHOPX_CACHE_CAPACITY` - Maximum cached query results (default: 1000)
//! - `SHOPX_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: 30)
//! - `SHOPX_STATE_DIR` - Directory for persisted state (default: `.shopx`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::transport::MockMode;

const DEFAULT_ENDPOINT: &str = "http://localhost:4000/graphql";
const DEFAULT_SITE_NAME: &str = "ShopX";
const DEFAULT_SERVICES_BASE_PATH: &str = "/api/serverSideServices";
const DEFAULT_STATE_DIR: &str = ".shopx";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Placeholder patterns rejected for the services token (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// ShopX client configuration.
///
/// Implements `Debug` manually to redact the services token.
#[derive(Clone)]
pub struct ShopxConfig {
    /// Configured GraphQL endpoint.
    pub graphql_endpoint: Url,
    /// CDN base for relative image URLs.
    pub image_cdn_url: Option<String>,
    /// Display name.
    pub site_name: String,
    /// Route requests through the server-side services proxy.
    pub use_server_services: bool,
    /// Path of the proxy on the endpoint's origin.
    pub server_services_base_path: String,
    /// Static token for the proxy.
    pub server_services_token: Option<SecretString>,
    /// When fixture data may stand in for failed requests.
    pub mock_fallback: MockMode,
    /// How long unused query results stay cached.
    pub cache_ttl: Duration,
    /// Maximum number of cached query results.
    pub cache_capacity: u64,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// Directory for persisted state.
    pub state_dir: PathBuf,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ShopxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopxConfig")
            .field("graphql_endpoint", &self.graphql_endpoint.as_str())
            .field("image_cdn_url", &self.image_cdn_url)
            .field("site_name", &self.site_name)
            .field("use_server_services", &self.use_server_services)
            .field("server_services_base_path", &self.server_services_base_path)
            .field(
                "server_services_token",
                &self.server_services_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("mock_fallback", &self.mock_fallback)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_capacity", &self.cache_capacity)
            .field("request_timeout", &self.request_timeout)
            .field("state_dir", &self.state_dir)
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl Default for ShopxConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: Url::parse(DEFAULT_ENDPOINT).expect("Invalid default endpoint"),
            image_cdn_url: None,
            site_name: DEFAULT_SITE_NAME.to_string(),
            use_server_services: false,
            server_services_base_path: DEFAULT_SERVICES_BASE_PATH.to_string(),
            server_services_token: None,
            mock_fallback: MockMode::Off,
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 1000,
            request_timeout: Duration::from_secs(30),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            sentry_dsn: None,
        }
    }
}

impl ShopxConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the services token
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the services token
    /// fails validation.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let endpoint = env.or_default("SHOPX_GRAPHQL_ENDPOINT", DEFAULT_ENDPOINT);
        let graphql_endpoint = Url::parse(&endpoint).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPX_GRAPHQL_ENDPOINT".to_string(), e.to_string())
        })?;
        if !matches!(graphql_endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPX_GRAPHQL_ENDPOINT".to_string(),
                "must be an http(s) URL".to_string(),
            ));
        }

        let use_server_services = env
            .optional("SHOPX_USE_SERVER_SERVICES")
            .is_some_and(|v| parse_flag(&v));

        let server_services_token = match env.optional("SHOPX_SERVER_SERVICES_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "SHOPX_SERVER_SERVICES_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        let mock_fallback = env
            .or_default("SHOPX_MOCK_FALLBACK", "off")
            .parse::<MockMode>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPX_MOCK_FALLBACK".to_string(), e))?;

        Ok(Self {
            graphql_endpoint,
            image_cdn_url: env.optional("SHOPX_IMAGE_CDN_URL"),
            site_name: env.or_default("SHOPX_SITE_NAME", DEFAULT_SITE_NAME),
            use_server_services,
            server_services_base_path: env
                .or_default("SHOPX_SERVER_SERVICES_BASE_PATH", DEFAULT_SERVICES_BASE_PATH),
            server_services_token,
            mock_fallback,
            cache_ttl: Duration::from_secs(env.number("SHOPX_CACHE_TTL_SECS", 60)?),
            cache_capacity: env.number("SHOPX_CACHE_CAPACITY", 1000)?,
            request_timeout: Duration::from_secs(env.number("SHOPX_REQUEST_TIMEOUT_SECS", 30)?),
            state_dir: PathBuf::from(env.or_default("SHOPX_STATE_DIR", DEFAULT_STATE_DIR)),
            sentry_dsn: env.optional("SENTRY_DSN"),
        })
    }

    /// The URL requests are actually sent to.
    ///
    /// In proxy mode this is `{origin}{base path}/graphql` on the configured
    /// endpoint's origin; otherwise the configured endpoint itself.
    #[must_use]
    pub fn effective_endpoint(&self) -> String {
        if !self.use_server_services {
            return self.graphql_endpoint.to_string();
        }
        let origin = self.graphql_endpoint.origin().ascii_serialization();
        let base = self.server_services_base_path.trim_end_matches('/');
        let base = if base.is_empty() || base.starts_with('/') {
            base.to_string()
        } else {
            format!("/{base}")
        };
        format!("{origin}{base}/graphql")
    }

    /// Token to send in the services header, when proxy mode is on.
    #[must_use]
    pub fn services_token(&self) -> Option<&str> {
        if self.use_server_services {
            self.server_services_token
                .as_ref()
                .map(|t| t.expose_secret())
        } else {
            None
        }
    }

    /// Resolve a possibly relative image path against the CDN base.
    ///
    /// Absolute `http(s)` URLs pass through. Without a CDN base the path is
    /// returned unchanged.
    #[must_use]
    pub fn resolve_image_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.image_cdn_url {
            Some(base) if !path.is_empty() => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            _ => path.to_string(),
        }
    }
}

/// `1/true/yes/on` are true; anything else is false.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn number(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        self.optional(key).map_or(Ok(default), |v| {
            v.trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholder or low-entropy secrets.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ShopxConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ShopxConfig::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.graphql_endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.site_name, "ShopX");
        assert!(!config.use_server_services);
        assert_eq!(config.mock_fallback, MockMode::Off);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.effective_endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_flag_parsing() {
        for value in ["1", "true", "YES", " on "] {
            assert!(parse_flag(value), "{value}");
        }
        for value in ["0", "false", "no", "off", "maybe", ""] {
            assert!(!parse_flag(value), "{value}");
        }
    }

    #[test]
    fn test_proxy_endpoint() {
        let config = load(&[
            ("SHOPX_GRAPHQL_ENDPOINT", "https://api.shopx.app:8443/v1/graphql"),
            ("SHOPX_USE_SERVER_SERVICES", "true"),
            ("SHOPX_SERVER_SERVICES_BASE_PATH", "/api/serverSideServices///"),
        ])
        .unwrap();
        assert_eq!(
            config.effective_endpoint(),
            "https://api.shopx.app:8443/api/serverSideServices/graphql"
        );
    }

    #[test]
    fn test_services_token_only_sent_in_proxy_mode() {
        let token = "k8F2qL9xZr4Tm7Wv";
        let direct = load(&[("SHOPX_SERVER_SERVICES_TOKEN", token)]).unwrap();
        assert_eq!(direct.services_token(), None);

        let proxied = load(&[
            ("SHOPX_SERVER_SERVICES_TOKEN", token),
            ("SHOPX_USE_SERVER_SERVICES", "1"),
        ])
        .unwrap();
        assert_eq!(proxied.services_token(), Some(token));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = load(&[("SHOPX_SERVER_SERVICES_TOKEN", "your-token-here")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));

        let err = load(&[("SHOPX_SERVER_SERVICES_TOKEN", "aaaaaaaaaaaaaaaa")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("SHOPX_GRAPHQL_ENDPOINT", "not a url")]).is_err());
        assert!(load(&[("SHOPX_GRAPHQL_ENDPOINT", "ftp://host/graphql")]).is_err());
        assert!(load(&[("SHOPX_CACHE_TTL_SECS", "soon")]).is_err());
        assert!(load(&[("SHOPX_MOCK_FALLBACK", "sometimes")]).is_err());
        assert_eq!(load(&[("SHOPX_SITE_NAME", "  ")]).unwrap().site_name, "ShopX");
    }

    #[test]
    fn test_mock_modes() {
        let config = load(&[("SHOPX_MOCK_FALLBACK", "network")]).unwrap();
        assert_eq!(config.mock_fallback, MockMode::NetworkErrors);
        let config = load(&[("SHOPX_MOCK_FALLBACK", "always")]).unwrap();
        assert_eq!(config.mock_fallback, MockMode::AnyError);
    }

    #[test]
    fn test_resolve_image_url() {
        let mut config = ShopxConfig::default();
        assert_eq!(config.resolve_image_url("/img/a.jpg"), "/img/a.jpg");

        config.image_cdn_url = Some("https://cdn.shopx.app/".to_string());
        assert_eq!(
            config.resolve_image_url("/img/a.jpg"),
            "https://cdn.shopx.app/img/a.jpg"
        );
        assert_eq!(
            config.resolve_image_url("https://other.example/b.png"),
            "https://other.example/b.png"
        );
        assert_eq!(config.resolve_image_url(""), "");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[("SHOPX_SERVER_SERVICES_TOKEN", "k8F2qL9xZr4Tm7Wv")]).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("k8F2qL9xZr4Tm7Wv"));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }
}
