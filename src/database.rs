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

//! Database implementation for the Neo4j HTTP ADBC driver.

use crate::auth::{AuthProvider, BasicAuth, BearerToken};
use crate::client::executor::DEFAULT_DISCOVERY_PATH;
use crate::client::{HttpClientConfig, HttpExecutor, Neo4jExecutor, Neo4jHttpClient};
use crate::connection::{Connection, ConnectionConfig};
use crate::error::Neo4jErrorHelper;
use crate::logging::{init_logging, parse_level, LogConfig};
use adbc_core::error::Result;
use adbc_core::options::{OptionConnection, OptionDatabase, OptionValue};
use adbc_core::Optionable;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Holds the configuration connections are created from.
///
/// Options like the server URI, credentials and HTTP timeouts are set on the
/// Database before creating connections.
pub struct Database {
    uri: Option<String>,
    username: Option<String>,
    password: Option<String>,
    bearer_token: Option<String>,
    discovery_path: String,

    http_config: HttpClientConfig,
    log_config: LogConfig,
}

// Credentials are redacted from debug output.
impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |set: bool| if set { "<redacted>" } else { "<not set>" };
        f.debug_struct("Database")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &redacted(self.password.is_some()))
            .field("bearer_token", &redacted(self.bearer_token.is_some()))
            .field("discovery_path", &self.discovery_path)
            .field("http_config", &self.http_config)
            .field("log_config", &self.log_config)
            .finish()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self {
            uri: None,
            username: None,
            password: None,
            bearer_token: None,
            discovery_path: DEFAULT_DISCOVERY_PATH.to_string(),
            http_config: HttpClientConfig::default(),
            log_config: LogConfig::default(),
        }
    }
}

impl Database {
    /// Creates a new Database instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configured URI.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns the configured user name.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the discovery path used for the server version query.
    pub fn discovery_path(&self) -> &str {
        &self.discovery_path
    }

    /// Returns the HTTP client configuration.
    pub fn http_config(&self) -> &HttpClientConfig {
        &self.http_config
    }

    /// Auth provider for the configured credentials. A bearer token takes
    /// precedence over a user name and password.
    fn auth_provider(&self) -> Option<Arc<dyn AuthProvider>> {
        if let Some(ref token) = self.bearer_token {
            return Some(Arc::new(BearerToken::new(token.clone())));
        }
        self.username.as_ref().map(|user| {
            Arc::new(BasicAuth::new(
                user.clone(),
                self.password.clone().unwrap_or_default(),
            )) as Arc<dyn AuthProvider>
        })
    }

    fn parse_string_option(value: &OptionValue) -> Option<String> {
        match value {
            OptionValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Parse a non-negative integer option value.
    fn parse_int_option(value: &OptionValue) -> Option<u64> {
        match value {
            OptionValue::String(s) => s.trim().parse().ok(),
            OptionValue::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    fn parse_duration_ms_option(value: &OptionValue) -> Option<Duration> {
        Self::parse_int_option(value).map(Duration::from_millis)
    }

    fn validate_uri(uri: &str) -> crate::error::Result<()> {
        let url = reqwest::Url::parse(uri).map_err(|e| {
            Neo4jErrorHelper::invalid_argument().message(format!("invalid uri '{}': {}", uri, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Neo4jErrorHelper::invalid_argument().message(format!(
                "unsupported uri scheme '{}', expected http or https",
                scheme
            ))),
        }
    }
}

impl Optionable for Database {
    type Option = OptionDatabase;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        let invalid = || Neo4jErrorHelper::set_invalid_option(&key, &value).to_adbc();
        match key {
            OptionDatabase::Uri => {
                let uri = Self::parse_string_option(&value).ok_or_else(invalid)?;
                Self::validate_uri(&uri)?;
                self.uri = Some(uri);
                Ok(())
            }
            OptionDatabase::Username => {
                self.username = Some(Self::parse_string_option(&value).ok_or_else(invalid)?);
                Ok(())
            }
            OptionDatabase::Password => {
                self.password = Some(Self::parse_string_option(&value).ok_or_else(invalid)?);
                Ok(())
            }
            OptionDatabase::Other(ref s) => match s.as_str() {
                "neo4j.auth.bearer_token" => {
                    self.bearer_token =
                        Some(Self::parse_string_option(&value).ok_or_else(invalid)?);
                    Ok(())
                }
                "neo4j.http.discovery_path" => {
                    self.discovery_path = Self::parse_string_option(&value).ok_or_else(invalid)?;
                    Ok(())
                }
                "neo4j.http.connect_timeout_ms" => {
                    self.http_config.connect_timeout =
                        Self::parse_duration_ms_option(&value).ok_or_else(invalid)?;
                    Ok(())
                }
                "neo4j.http.read_timeout_ms" => {
                    self.http_config.read_timeout =
                        Self::parse_duration_ms_option(&value).ok_or_else(invalid)?;
                    Ok(())
                }
                "neo4j.http.retry_delay_ms" => {
                    self.http_config.retry_delay =
                        Self::parse_duration_ms_option(&value).ok_or_else(invalid)?;
                    Ok(())
                }
                "neo4j.http.max_retries" => {
                    let retries = Self::parse_int_option(&value)
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(invalid)?;
                    self.http_config.max_retries = retries;
                    Ok(())
                }
                "neo4j.log_level" => {
                    let level = Self::parse_string_option(&value)
                        .and_then(|v| parse_level(&v))
                        .ok_or_else(invalid)?;
                    self.log_config.level = Some(level);
                    Ok(())
                }
                "neo4j.log_file" => {
                    self.log_config.file =
                        Some(Self::parse_string_option(&value).ok_or_else(invalid)?);
                    Ok(())
                }
                _ => Err(Neo4jErrorHelper::set_unknown_option(&key).to_adbc()),
            },
            _ => Err(Neo4jErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        match key {
            OptionDatabase::Uri => self.uri.clone().ok_or_else(|| {
                Neo4jErrorHelper::invalid_state()
                    .message("option 'uri' is not set")
                    .to_adbc()
            }),
            OptionDatabase::Username => self.username.clone().ok_or_else(|| {
                Neo4jErrorHelper::invalid_state()
                    .message("option 'username' is not set")
                    .to_adbc()
            }),
            OptionDatabase::Other(ref s) => match s.as_str() {
                "neo4j.http.discovery_path" => Ok(self.discovery_path.clone()),
                "neo4j.log_level" => self.log_config.level.clone().ok_or_else(|| {
                    Neo4jErrorHelper::invalid_state()
                        .message("option 'neo4j.log_level' is not set")
                        .to_adbc()
                }),
                _ => Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc()),
            },
            _ => Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        let millis = |d: Duration| i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
        match key {
            OptionDatabase::Other(ref s) => match s.as_str() {
                "neo4j.http.connect_timeout_ms" => Ok(millis(self.http_config.connect_timeout)),
                "neo4j.http.read_timeout_ms" => Ok(millis(self.http_config.read_timeout)),
                "neo4j.http.retry_delay_ms" => Ok(millis(self.http_config.retry_delay)),
                "neo4j.http.max_retries" => Ok(self.http_config.max_retries as i64),
                _ => Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc()),
            },
            _ => Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

impl adbc_core::Database for Database {
    type ConnectionType = Connection;

    fn new_connection(&self) -> Result<Self::ConnectionType> {
        init_logging(&self.log_config);

        let uri = self.uri.as_ref().ok_or_else(|| {
            Neo4jErrorHelper::invalid_argument()
                .message("uri not set")
                .to_adbc()
        })?;

        debug!("Creating connection to {}", uri);

        let http_client = Arc::new(
            Neo4jHttpClient::new(self.http_config.clone(), self.auth_provider())
                .map_err(|e| e.to_adbc())?,
        );
        let executor: Arc<dyn Neo4jExecutor> = Arc::new(
            HttpExecutor::new(http_client, uri.clone())
                .with_discovery_path(self.discovery_path.clone()),
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| {
                Neo4jErrorHelper::io()
                    .message(format!("Failed to create runtime: {}", e))
                    .to_adbc()
            })?;

        Ok(Connection::new(
            ConnectionConfig {
                uri: uri.clone(),
                user: self.username.clone(),
                executor: Some(executor),
            },
            runtime,
        ))
    }

    fn new_connection_with_opts(
        &self,
        opts: impl IntoIterator<Item = (OptionConnection, OptionValue)>,
    ) -> Result<Self::ConnectionType> {
        let mut connection = self.new_connection()?;
        for (key, value) in opts {
            connection.set_option(key, value)?;
        }
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adbc_core::error::Status;

    #[test]
    fn test_database_set_options() {
        let mut db = Database::new();
        db.set_option(
            OptionDatabase::Uri,
            OptionValue::String("http://localhost:7474".into()),
        )
        .unwrap();
        db.set_option(OptionDatabase::Username, OptionValue::String("neo4j".into()))
            .unwrap();
        db.set_option(
            OptionDatabase::Other("neo4j.http.discovery_path".into()),
            OptionValue::String("/db/data/".into()),
        )
        .unwrap();

        assert_eq!(db.uri(), Some("http://localhost:7474"));
        assert_eq!(db.username(), Some("neo4j"));
        assert_eq!(db.discovery_path(), "/db/data/");
        assert_eq!(
            db.get_option_string(OptionDatabase::Uri).unwrap(),
            "http://localhost:7474"
        );
    }

    #[test]
    fn test_database_rejects_bad_uri() {
        let mut db = Database::new();
        let err = db
            .set_option(
                OptionDatabase::Uri,
                OptionValue::String("bolt://localhost:7687".into()),
            )
            .unwrap_err();
        assert_eq!(err.status, Status::InvalidArguments);

        let err = db
            .set_option(OptionDatabase::Uri, OptionValue::Int(7474))
            .unwrap_err();
        assert_eq!(err.status, Status::InvalidArguments);
        assert_eq!(db.uri(), None);
    }

    #[test]
    fn test_database_http_options() {
        let mut db = Database::new();
        db.set_option(
            OptionDatabase::Other("neo4j.http.read_timeout_ms".into()),
            OptionValue::String("1500".into()),
        )
        .unwrap();
        db.set_option(
            OptionDatabase::Other("neo4j.http.max_retries".into()),
            OptionValue::Int(0),
        )
        .unwrap();

        assert_eq!(db.http_config().read_timeout, Duration::from_millis(1500));
        assert_eq!(db.http_config().max_retries, 0);
        assert_eq!(
            db.get_option_int(OptionDatabase::Other("neo4j.http.read_timeout_ms".into()))
                .unwrap(),
            1500
        );

        let err = db
            .set_option(
                OptionDatabase::Other("neo4j.http.max_retries".into()),
                OptionValue::Int(-1),
            )
            .unwrap_err();
        assert_eq!(err.status, Status::InvalidArguments);
    }

    #[test]
    fn test_database_log_level_validated() {
        let mut db = Database::new();
        db.set_option(
            OptionDatabase::Other("neo4j.log_level".into()),
            OptionValue::String("DEBUG".into()),
        )
        .unwrap();
        assert_eq!(
            db.get_option_string(OptionDatabase::Other("neo4j.log_level".into()))
                .unwrap(),
            "debug"
        );

        assert!(db
            .set_option(
                OptionDatabase::Other("neo4j.log_level".into()),
                OptionValue::String("chatty".into()),
            )
            .is_err());
    }

    #[test]
    fn test_database_unknown_option() {
        let mut db = Database::new();
        let err = db
            .set_option(
                OptionDatabase::Other("neo4j.nope".into()),
                OptionValue::String("x".into()),
            )
            .unwrap_err();
        assert_eq!(err.status, Status::NotFound);
    }

    #[test]
    fn test_auth_provider_selection() {
        let mut db = Database::new();
        assert!(db.auth_provider().is_none());

        db.set_option(OptionDatabase::Username, OptionValue::String("neo4j".into()))
            .unwrap();
        db.set_option(OptionDatabase::Password, OptionValue::String("test".into()))
            .unwrap();
        let header = db.auth_provider().unwrap().get_auth_header().unwrap();
        assert_eq!(header, "Basic bmVvNGo6dGVzdA==");

        db.set_option(
            OptionDatabase::Other("neo4j.auth.bearer_token".into()),
            OptionValue::String("tok".into()),
        )
        .unwrap();
        let header = db.auth_provider().unwrap().get_auth_header().unwrap();
        assert_eq!(header, "Bearer tok");
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut db = Database::new();
        db.set_option(OptionDatabase::Password, OptionValue::String("hunter2".into()))
            .unwrap();
        let rendered = format!("{:?}", db);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_database_new_connection_missing_uri() {
        use adbc_core::Database as _;

        let db = Database::new();
        let result = db.new_connection();
        assert!(result.is_err());
    }

    #[test]
    fn test_new_connection_wires_executor() {
        use adbc_core::Database as _;

        let mut db = Database::new();
        db.set_option(
            OptionDatabase::Uri,
            OptionValue::String("http://localhost:7474".into()),
        )
        .unwrap();
        let conn = db.new_connection().unwrap();
        assert_eq!(conn.uri(), "http://localhost:7474");
        assert_eq!(
            conn.executor().map(|e| e.endpoint()),
            Some("http://localhost:7474")
        );
    }
}
