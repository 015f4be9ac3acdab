// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP client for the Neo4j HTTP API.
//!
//! This module provides a low-level HTTP client with:
//! - Connection pooling
//! - Automatic retry with exponential backoff
//! - Basic / Bearer authentication
//! - Configurable timeouts

use crate::auth::AuthProvider;
use crate::error::{Neo4jErrorHelper, Result};
use reqwest::{Client, Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Read timeout duration.
    pub read_timeout: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retry attempts (doubles each retry).
    pub retry_delay: Duration,
    /// Maximum number of idle connections per host.
    pub max_connections_per_host: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            max_connections_per_host: 10,
            user_agent: format!("neo4j-adbc-http/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for communicating with a Neo4j server.
///
/// Requests are retried on transient failures (network errors, 429, 502,
/// 503, 504). When an auth provider is configured its header is attached to
/// every attempt.
#[derive(Debug)]
pub struct Neo4jHttpClient {
    client: Client,
    config: HttpClientConfig,
    auth_provider: Option<Arc<dyn AuthProvider>>,
}

impl Neo4jHttpClient {
    /// Creates a new HTTP client. `auth_provider` is `None` for servers
    /// running with authentication disabled.
    pub fn new(
        config: HttpClientConfig,
        auth_provider: Option<Arc<dyn AuthProvider>>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .pool_max_idle_per_host(config.max_connections_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                Neo4jErrorHelper::io().message(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            auth_provider,
        })
    }

    /// Returns the underlying reqwest client for building requests.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the authorization header value, if any.
    pub fn auth_header(&self) -> Result<Option<String>> {
        self.auth_provider
            .as_ref()
            .map(|provider| provider.get_auth_header())
            .transpose()
    }

    /// Execute an HTTP request with retry logic and authentication.
    ///
    /// Non-retryable HTTP errors are returned immediately; 401 and 403 map to
    /// `Unauthenticated` and `Unauthorized`, everything else to `Io`.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let mut attempts = 0;
        let mut last_error: Option<String> = None;

        let method = request.method().clone();
        let url = request.url().clone();
        let headers = request.headers().clone();
        let body_bytes = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| b.to_vec());
        let auth_header = self.auth_header()?;

        loop {
            attempts += 1;

            let mut req_builder = self.client.request(method.clone(), url.clone());
            for (name, value) in headers.iter() {
                req_builder = req_builder.header(name, value);
            }
            if let Some(ref auth) = auth_header {
                req_builder = req_builder.header("Authorization", auth);
            }
            if let Some(ref body) = body_bytes {
                req_builder = req_builder.body(body.clone());
            }

            let request = req_builder.build().map_err(|e| {
                Neo4jErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

            debug!(
                "Executing {} {} (attempt {}/{})",
                method,
                url,
                attempts,
                self.config.max_retries + 1
            );

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    if Self::is_retryable_status(status) && attempts <= self.config.max_retries {
                        last_error = Some(format!("HTTP {}", status.as_u16()));
                        warn!(
                            "Request failed with {} (attempt {}/{}), retrying...",
                            status,
                            attempts,
                            self.config.max_retries + 1
                        );
                        self.wait_for_retry(attempts).await;
                        continue;
                    }

                    let error_body = response.text().await.unwrap_or_default();
                    let message = format!("HTTP {} - {}", status.as_u16(), error_body);
                    return Err(match status {
                        StatusCode::UNAUTHORIZED => {
                            Neo4jErrorHelper::unauthenticated().message(message)
                        }
                        StatusCode::FORBIDDEN => Neo4jErrorHelper::unauthorized().message(message),
                        _ => Neo4jErrorHelper::io().message(message),
                    });
                }
                Err(e) => {
                    if Self::is_retryable_error(&e) && attempts <= self.config.max_retries {
                        last_error = Some(e.to_string());
                        warn!(
                            "Request failed with error (attempt {}/{}): {}, retrying...",
                            attempts,
                            self.config.max_retries + 1,
                            e
                        );
                        self.wait_for_retry(attempts).await;
                        continue;
                    }

                    return Err(Neo4jErrorHelper::io().message(format!(
                        "HTTP request failed after {} attempts: {}",
                        attempts,
                        last_error.unwrap_or_else(|| e.to_string())
                    )));
                }
            }
        }
    }

    fn is_retryable_status(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
                | StatusCode::BAD_GATEWAY
        )
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect() || error.is_request()
    }

    /// Wait with exponential backoff before retry.
    async fn wait_for_retry(&self, attempt: u32) {
        let delay = self.config.retry_delay * 2u32.saturating_pow(attempt.saturating_sub(1));
        debug!("Waiting {:?} before retry", delay);
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BasicAuth;
    use crate::error::ErrorKind;
    use reqwest::Method;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config() -> HttpClientConfig {
        HttpClientConfig {
            max_retries: 2,
            retry_delay: Duration::from_millis(1),
            ..HttpClientConfig::default()
        }
    }

    fn get(client: &Neo4jHttpClient, url: &str) -> Request {
        client.inner().request(Method::GET, url).build().unwrap()
    }

    #[test]
    fn test_http_client_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.read_timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 3);
        assert!(config.user_agent.starts_with("neo4j-adbc-http/"));
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(Neo4jHttpClient::is_retryable_status(
            StatusCode::TOO_MANY_REQUESTS
        ));
        assert!(Neo4jHttpClient::is_retryable_status(
            StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(Neo4jHttpClient::is_retryable_status(
            StatusCode::BAD_GATEWAY
        ));
        assert!(!Neo4jHttpClient::is_retryable_status(StatusCode::OK));
        assert!(!Neo4jHttpClient::is_retryable_status(
            StatusCode::UNAUTHORIZED
        ));
        assert!(!Neo4jHttpClient::is_retryable_status(
            StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_auth_header_absent_without_provider() {
        let client = Neo4jHttpClient::new(HttpClientConfig::default(), None).unwrap();
        assert_eq!(client.auth_header().unwrap(), None);
    }

    #[tokio::test]
    async fn test_execute_sends_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("Authorization", "Basic bmVvNGo6dGVzdA=="))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let auth: Arc<dyn AuthProvider> = Arc::new(BasicAuth::new("neo4j", "test"));
        let client = Neo4jHttpClient::new(fast_config(), Some(auth)).unwrap();
        let response = client.execute(get(&client, &server.uri())).await.unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_execute_retries_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = Neo4jHttpClient::new(fast_config(), None).unwrap();
        let err = client
            .execute(get(&client, &server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.text().contains("503"));
    }

    #[tokio::test]
    async fn test_execute_maps_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("no credentials"))
            .expect(1)
            .mount(&server)
            .await;

        let client = Neo4jHttpClient::new(fast_config(), None).unwrap();
        let err = client
            .execute(get(&client, &server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert!(err.text().contains("no credentials"));
    }

    #[tokio::test]
    async fn test_execute_maps_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("read only user"))
            .expect(1)
            .mount(&server)
            .await;

        let client = Neo4jHttpClient::new(fast_config(), None).unwrap();
        let err = client
            .execute(get(&client, &server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.text().contains("403"));
    }

    #[tokio::test]
    async fn test_execute_retries_connection_errors() {
        // Reserve a port, then close it so connections are refused.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let config = HttpClientConfig {
            max_retries: 1,
            ..fast_config()
        };
        let client = Neo4jHttpClient::new(config, None).unwrap();
        let err = client
            .execute(get(&client, &format!("http://127.0.0.1:{}/", port)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.text().contains("after 2 attempts"));
    }
}
