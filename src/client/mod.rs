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

//! Client implementations for communicating with a Neo4j server over HTTP.
//!
//! This module provides:
//! - `Neo4jExecutor` trait: the transport a `Connection` talks through
//! - `Neo4jHttpClient`: Low-level HTTP client with retry logic
//! - `HttpExecutor`: `Neo4jExecutor` backed by the Neo4j HTTP API

pub mod executor;
pub mod http;

use crate::error::Result;
use async_trait::async_trait;

pub use executor::HttpExecutor;
pub use http::{HttpClientConfig, Neo4jHttpClient};

/// Network executor owned by a `Connection`.
///
/// Implementations own the channel to the server and decide timeout and
/// retry policy. Callers must not retry on top of them.
#[async_trait]
pub trait Neo4jExecutor: Send + Sync + std::fmt::Debug {
    /// Base URI of the server this executor talks to.
    fn endpoint(&self) -> &str;

    /// Ask the server for its version string.
    ///
    /// Performs one round-trip. The returned value is exactly what the server
    /// reported.
    async fn server_version(&self) -> Result<String>;
}
