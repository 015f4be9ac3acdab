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

//! Connection implementation for the Neo4j HTTP ADBC driver.

use crate::client::Neo4jExecutor;
use crate::error::Neo4jErrorHelper;
use crate::metadata::{self, build_info, DatabaseMetadata};
use crate::statement::Statement;
use adbc_core::error::Result;
use adbc_core::options::{InfoCode, ObjectDepth, OptionConnection, OptionValue};
use adbc_core::Optionable;
use arrow_array::{RecordBatch, RecordBatchIterator, RecordBatchReader};
use arrow_schema::{ArrowError, Schema};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Option key exposing the resolved server version.
pub const SERVER_VERSION_OPTION: &str = "neo4j.server_version";

/// Configuration passed from Database to Connection.
pub struct ConnectionConfig {
    pub uri: String,
    pub user: Option<String>,
    pub executor: Option<Arc<dyn Neo4jExecutor>>,
}

/// Represents a session with a Neo4j server.
///
/// A Connection owns at most one executor. Without one (not wired up, or
/// released by [`Connection::close`]) the connection still answers metadata
/// requests, with the server version left unknown.
#[derive(Debug)]
pub struct Connection {
    uri: String,
    user: Option<String>,

    executor: Option<Arc<dyn Neo4jExecutor>>,

    // Resolved on first request, kept for the lifetime of the connection.
    // Held across resolution so concurrent callers share one round-trip.
    metadata: Mutex<Option<Arc<DatabaseMetadata>>>,

    // Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,
}

/// Type alias for our empty reader used in stub implementations.
type EmptyReader =
    RecordBatchIterator<std::vec::IntoIter<std::result::Result<RecordBatch, ArrowError>>>;

impl Connection {
    /// Creates a connection around `config.executor`.
    ///
    /// `Database::new_connection()` is the usual entry point; this exists for
    /// callers supplying their own executor.
    pub fn new(config: ConnectionConfig, runtime: tokio::runtime::Runtime) -> Self {
        debug!(
            "Opening connection to {} (executor: {})",
            config.uri,
            config.executor.is_some()
        );

        Self {
            uri: config.uri,
            user: config.user,
            executor: config.executor,
            metadata: Mutex::new(None),
            runtime,
        }
    }

    /// Returns the server URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the configured user name.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the executor, if one is wired up.
    pub fn executor(&self) -> Option<&Arc<dyn Neo4jExecutor>> {
        self.executor.as_ref()
    }

    /// Run a future to completion on the connection's runtime.
    ///
    /// Fails with `InvalidState` when called from inside another Tokio
    /// runtime, where blocking the thread would panic.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> crate::error::Result<F::Output> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Neo4jErrorHelper::invalid_state()
                .message("blocking connection call made from within an async runtime"));
        }
        Ok(self.runtime.block_on(future))
    }

    /// Metadata snapshot for this connection.
    ///
    /// Resolved on the first call and cached. A failed resolution is
    /// returned to the caller and not cached.
    pub fn metadata(&self) -> crate::error::Result<Arc<DatabaseMetadata>> {
        let mut cached = self
            .metadata
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(metadata) = cached.as_ref() {
            return Ok(metadata.clone());
        }
        let resolved = Arc::new(metadata::resolve(Some(self))?);
        *cached = Some(resolved.clone());
        Ok(resolved)
    }

    /// Release the executor. An already resolved metadata snapshot is kept.
    pub fn close(&mut self) {
        if let Some(executor) = self.executor.take() {
            debug!("Releasing executor for {}", executor.endpoint());
        }
    }
}

impl Optionable for Connection {
    type Option = OptionConnection;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        match key {
            OptionConnection::AutoCommit => match value {
                OptionValue::String(ref s) if s.eq_ignore_ascii_case("true") => Ok(()),
                // Explicit transactions are not supported over this transport
                OptionValue::String(ref s) if s.eq_ignore_ascii_case("false") => {
                    Err(Neo4jErrorHelper::not_implemented()
                        .message("disabling autocommit")
                        .to_adbc())
                }
                _ => Err(Neo4jErrorHelper::set_invalid_option(&key, &value).to_adbc()),
            },
            _ => Err(Neo4jErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        match key {
            OptionConnection::AutoCommit => Ok("true".to_string()),
            OptionConnection::Other(ref s) if s == SERVER_VERSION_OPTION => {
                let metadata = self.metadata()?;
                metadata
                    .database_product_version()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        Neo4jErrorHelper::invalid_state()
                            .message("server version is unknown")
                            .to_adbc()
                    })
            }
            _ => Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

impl adbc_core::Connection for Connection {
    type StatementType = Statement;

    fn new_statement(&mut self) -> Result<Self::StatementType> {
        Ok(Statement::new())
    }

    fn cancel(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_info(&self, codes: Option<HashSet<InfoCode>>) -> Result<impl RecordBatchReader + Send> {
        let metadata = self.metadata()?;
        Ok(build_info(&metadata, codes.as_ref())?)
    }

    fn get_objects(
        &self,
        _depth: ObjectDepth,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: Option<&str>,
        _table_type: Option<Vec<&str>>,
        _column_name: Option<&str>,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            Neo4jErrorHelper::not_implemented()
                .message("get_objects")
                .to_adbc(),
        )
    }

    fn get_table_schema(
        &self,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: &str,
    ) -> Result<Schema> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("get_table_schema")
            .to_adbc())
    }

    fn get_table_types(&self) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            Neo4jErrorHelper::not_implemented()
                .message("get_table_types")
                .to_adbc(),
        )
    }

    fn read_partition(
        &self,
        _partition: impl AsRef<[u8]>,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            Neo4jErrorHelper::not_implemented()
                .message("read_partition")
                .to_adbc(),
        )
    }

    fn commit(&mut self) -> Result<()> {
        // Auto-commit only
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("rollback - connection is auto-commit only")
            .to_adbc())
    }

    fn get_statistic_names(&self) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            Neo4jErrorHelper::not_implemented()
                .message("get_statistic_names")
                .to_adbc(),
        )
    }

    fn get_statistics(
        &self,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: Option<&str>,
        _approximate: bool,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            Neo4jErrorHelper::not_implemented()
                .message("get_statistics")
                .to_adbc(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use adbc_core::error::Status;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock executor replaying scripted version answers.
    #[derive(Debug)]
    struct MockExecutor {
        answers: Mutex<Vec<crate::error::Result<String>>>,
        calls: AtomicUsize,
    }

    impl MockExecutor {
        fn new(answers: Vec<crate::error::Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Neo4jExecutor for MockExecutor {
        fn endpoint(&self) -> &str {
            "http://mock:7474"
        }

        async fn server_version(&self) -> crate::error::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                Err(Neo4jErrorHelper::io().message("no scripted answer"))
            } else {
                answers.remove(0)
            }
        }
    }

    fn create_test_connection(executor: Option<Arc<dyn Neo4jExecutor>>) -> Connection {
        Connection::new(
            ConnectionConfig {
                uri: "http://mock:7474".to_string(),
                user: None,
                executor,
            },
            tokio::runtime::Runtime::new().unwrap(),
        )
    }

    #[test]
    fn test_metadata_is_cached() {
        let executor = MockExecutor::new(vec![Ok("4.4.3".to_string())]);
        let conn = create_test_connection(Some(executor.clone()));

        let first = conn.metadata().unwrap();
        let second = conn.metadata().unwrap();
        assert_eq!(first.database_product_version(), Some("4.4.3"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(executor.calls(), 1);
    }

    #[test]
    fn test_failed_metadata_is_not_cached() {
        let executor = MockExecutor::new(vec![
            Err(Neo4jErrorHelper::io().message("connection reset")),
            Ok("5.13.0".to_string()),
        ]);
        let conn = create_test_connection(Some(executor.clone()));

        let err = conn.metadata().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let metadata = conn.metadata().unwrap();
        assert_eq!(metadata.database_product_version(), Some("5.13.0"));
        assert_eq!(executor.calls(), 2);
    }

    /// Executor that takes a while to answer, counting calls.
    #[derive(Debug)]
    struct SlowExecutor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Neo4jExecutor for SlowExecutor {
        fn endpoint(&self) -> &str {
            "http://mock:7474"
        }

        async fn server_version(&self) -> crate::error::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok("5.13.0".to_string())
        }
    }

    #[test]
    fn test_concurrent_metadata_resolves_once() {
        let executor = Arc::new(SlowExecutor {
            calls: AtomicUsize::new(0),
        });
        let conn = create_test_connection(Some(executor.clone()));

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| conn.metadata())).collect();
            for handle in handles {
                let metadata = handle.join().unwrap().unwrap();
                assert_eq!(metadata.database_product_version(), Some("5.13.0"));
            }
        });
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_metadata_inside_async_runtime_is_an_error() {
        use adbc_core::Connection as _;

        let executor = MockExecutor::new(vec![Ok("4.4.3".to_string())]);
        let conn = create_test_connection(Some(executor.clone()));
        let outer = tokio::runtime::Runtime::new().unwrap();

        let (metadata_err, info_err) =
            outer.block_on(async { (conn.metadata().unwrap_err(), conn.get_info(None).err()) });
        assert_eq!(metadata_err.kind(), ErrorKind::InvalidState);
        assert_eq!(info_err.unwrap().status, Status::InvalidState);
        assert_eq!(executor.calls(), 0);

        // Usable again from a plain thread, nothing was cached.
        assert_eq!(
            conn.metadata().unwrap().database_product_version(),
            Some("4.4.3")
        );
    }

    #[test]
    fn test_close_releases_executor() {
        let executor = MockExecutor::new(vec![]);
        let mut conn = create_test_connection(Some(executor.clone()));
        conn.close();

        assert!(conn.executor().is_none());
        let metadata = conn.metadata().unwrap();
        assert_eq!(metadata.database_product_version(), None);
        assert_eq!(executor.calls(), 0);
    }

    #[test]
    fn test_close_keeps_resolved_snapshot() {
        let executor = MockExecutor::new(vec![Ok("4.4.3".to_string())]);
        let mut conn = create_test_connection(Some(executor));
        conn.metadata().unwrap();
        conn.close();

        assert_eq!(
            conn.metadata().unwrap().database_product_version(),
            Some("4.4.3")
        );
    }

    #[test]
    fn test_get_info_propagates_executor_failure() {
        use adbc_core::Connection as _;

        let executor = MockExecutor::new(vec![Err(
            Neo4jErrorHelper::unauthenticated().message("HTTP 401 - bad credentials")
        )]);
        let conn = create_test_connection(Some(executor));

        let err = conn.get_info(None).err().unwrap();
        assert_eq!(err.status, Status::Unauthenticated);
        assert!(err.message.contains("bad credentials"));
    }

    #[test]
    fn test_server_version_option() {
        let executor = MockExecutor::new(vec![Ok("4.4.3".to_string())]);
        let conn = create_test_connection(Some(executor));
        let version = conn
            .get_option_string(OptionConnection::Other(SERVER_VERSION_OPTION.into()))
            .unwrap();
        assert_eq!(version, "4.4.3");

        let conn = create_test_connection(None);
        let err = conn
            .get_option_string(OptionConnection::Other(SERVER_VERSION_OPTION.into()))
            .unwrap_err();
        assert_eq!(err.status, Status::InvalidState);
    }

    #[test]
    fn test_autocommit_option() {
        let mut conn = create_test_connection(None);
        assert!(conn
            .set_option(
                OptionConnection::AutoCommit,
                OptionValue::String("true".into())
            )
            .is_ok());
        let err = conn
            .set_option(
                OptionConnection::AutoCommit,
                OptionValue::String("false".into()),
            )
            .unwrap_err();
        assert_eq!(err.status, Status::NotImplemented);
    }

    #[test]
    fn test_unsupported_operations() {
        use adbc_core::Connection as _;

        let mut conn = create_test_connection(None);
        assert_eq!(
            conn.get_table_types().err().unwrap().status,
            Status::NotImplemented
        );
        assert!(conn.commit().is_ok());
        assert_eq!(conn.rollback().unwrap_err().status, Status::NotImplemented);
    }
}
