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

//! `Neo4jExecutor` implementation over the Neo4j HTTP API.

use crate::client::{Neo4jExecutor, Neo4jHttpClient};
use crate::error::{Neo4jErrorHelper, Result};
use crate::types::DiscoveryDocument;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Method;
use std::sync::Arc;
use tracing::debug;

/// Discovery path served by Neo4j 4.x and later.
pub const DEFAULT_DISCOVERY_PATH: &str = "/";

// Longest response body excerpt quoted in an error message.
const BODY_EXCERPT_CHARS: usize = 256;

/// Executor talking to a Neo4j server through its HTTP endpoint.
#[derive(Debug)]
pub struct HttpExecutor {
    http_client: Arc<Neo4jHttpClient>,
    endpoint: String,
    discovery_path: String,
}

impl HttpExecutor {
    pub fn new(http_client: Arc<Neo4jHttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            discovery_path: DEFAULT_DISCOVERY_PATH.to_string(),
        }
    }

    /// Use a different discovery path, e.g. `/db/data/` for 3.x servers.
    pub fn with_discovery_path(mut self, discovery_path: impl Into<String>) -> Self {
        self.discovery_path = discovery_path.into();
        self
    }

    pub fn discovery_path(&self) -> &str {
        &self.discovery_path
    }

    fn discovery_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.discovery_path.trim_start_matches('/')
        )
    }

    /// Fetch and decode the discovery document.
    pub async fn discover(&self) -> Result<DiscoveryDocument> {
        let url = self.discovery_url();

        debug!("Fetching discovery document at {}", url);

        let request = self
            .http_client
            .inner()
            .request(Method::GET, &url)
            .header(ACCEPT, "application/json")
            .build()
            .map_err(|e| {
                Neo4jErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

        let response = self.http_client.execute(request).await?;
        let body = response.text().await.map_err(|e| {
            Neo4jErrorHelper::io().message(format!("Failed to read response: {}", e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            Neo4jErrorHelper::invalid_data().message(format!(
                "Failed to parse discovery response: {} - body: {}",
                e,
                body_excerpt(&body)
            ))
        })
    }
}

/// Leading part of a response body, for error messages.
fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

#[async_trait]
impl Neo4jExecutor for HttpExecutor {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn server_version(&self) -> Result<String> {
        let document = self.discover().await?;

        debug!(
            "Discovery: version={:?}, edition={:?}",
            document.neo4j_version, document.neo4j_edition
        );

        document.neo4j_version.ok_or_else(|| {
            Neo4jErrorHelper::invalid_data().message(format!(
                "discovery response at {} has no neo4j_version",
                self.discovery_url()
            ))
        })
    }
}
