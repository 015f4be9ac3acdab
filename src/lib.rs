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

//! Neo4j ADBC Driver over HTTP
//!
//! This crate provides an ADBC (Arrow Database Connectivity) driver that
//! talks to a Neo4j server through its HTTP API instead of Bolt.
//!
//! ## Overview
//!
//! The driver implements the standard ADBC traits from `adbc_core`:
//! - [`Driver`] - Entry point for creating databases
//! - [`Database`] - Holds connection configuration
//! - [`Connection`] - Session with the server, owning its HTTP executor
//! - [`Statement`] - Holds a query
//!
//! Connection metadata (`Connection::metadata`, `get_info`) reports the
//! server version, asked from the server the first time it is requested.
//! A connection without an executor reports the version as unknown.
//!
//! ## Example
//!
//! ```ignore
//! use neo4j_adbc_http::Driver;
//! use adbc_core::{Connection as _, Database as _, Driver as _, Optionable};
//! use adbc_core::options::{OptionDatabase, OptionValue};
//!
//! let mut driver = Driver::new();
//! let mut database = driver.new_database()?;
//! database.set_option(OptionDatabase::Uri, OptionValue::String("http://localhost:7474".into()))?;
//! database.set_option(OptionDatabase::Username, OptionValue::String("neo4j".into()))?;
//! database.set_option(OptionDatabase::Password, OptionValue::String("secret".into()))?;
//!
//! let connection = database.new_connection()?;
//! let metadata = connection.metadata()?;
//! println!("{:?}", metadata.database_product_version());
//! ```
//!
//! ## Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `uri` | | Server URL (`http://` or `https://`) |
//! | `username` / `password` | | Basic auth credentials |
//! | `neo4j.auth.bearer_token` | | Bearer token, overrides Basic auth |
//! | `neo4j.http.discovery_path` | `/` | Discovery endpoint (`/db/data/` for 3.x) |
//! | `neo4j.http.connect_timeout_ms` | 30000 | Connect timeout |
//! | `neo4j.http.read_timeout_ms` | 60000 | Request timeout |
//! | `neo4j.http.max_retries` | 3 | Retry attempts for transient failures |
//! | `neo4j.http.retry_delay_ms` | 500 | Base backoff delay |
//! | `neo4j.log_level` | `warn` | Log level (`off` .. `trace`) |
//! | `neo4j.log_file` | stderr | Log file path |

pub mod auth;
pub mod client;
pub mod connection;
pub mod database;
pub mod driver;
pub mod error;
mod logging;
pub mod metadata;
pub mod statement;
pub mod types;

// Re-export main types
pub use connection::Connection;
pub use database::Database;
pub use driver::Driver;
pub use error::{Error, ErrorKind, Neo4jErrorHelper, Result};
pub use metadata::DatabaseMetadata;
pub use statement::Statement;

// Re-export client types for advanced users
pub use client::{HttpClientConfig, HttpExecutor, Neo4jExecutor, Neo4jHttpClient};
