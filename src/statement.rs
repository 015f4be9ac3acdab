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

//! Statement implementation for the Neo4j HTTP ADBC driver.
//!
//! Statements hold a query text; executing it is not supported by this
//! driver, so every execution entry point reports `NotImplemented`.

use crate::error::Neo4jErrorHelper;
use adbc_core::error::Result;
use adbc_core::options::{OptionStatement, OptionValue};
use adbc_core::Optionable;
use arrow_array::{RecordBatch, RecordBatchIterator, RecordBatchReader};
use arrow_schema::{ArrowError, Schema};

type EmptyReader =
    RecordBatchIterator<std::vec::IntoIter<std::result::Result<RecordBatch, ArrowError>>>;

/// A Cypher statement created from a Connection.
#[derive(Debug, Default)]
pub struct Statement {
    query: Option<String>,
}

impl Statement {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the current query.
    pub fn sql_query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl Optionable for Statement {
    type Option = OptionStatement;

    fn set_option(&mut self, key: Self::Option, _value: OptionValue) -> Result<()> {
        Err(Neo4jErrorHelper::set_unknown_option(&key).to_adbc())
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        Err(Neo4jErrorHelper::get_unknown_option(&key).to_adbc())
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

impl adbc_core::Statement for Statement {
    fn set_sql_query(&mut self, query: impl AsRef<str>) -> Result<()> {
        self.query = Some(query.as_ref().to_string());
        Ok(())
    }

    fn set_substrait_plan(&mut self, _plan: impl AsRef<[u8]>) -> Result<()> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("Substrait plans")
            .to_adbc())
    }

    fn prepare(&mut self) -> Result<()> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("prepare")
            .to_adbc())
    }

    fn get_parameter_schema(&self) -> Result<Schema> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("get_parameter_schema")
            .to_adbc())
    }

    fn bind(&mut self, _batch: RecordBatch) -> Result<()> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("bind parameters")
            .to_adbc())
    }

    fn bind_stream(&mut self, _stream: Box<dyn RecordBatchReader + Send>) -> Result<()> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("bind_stream")
            .to_adbc())
    }

    fn execute(&mut self) -> Result<impl RecordBatchReader + Send> {
        if self.query.is_none() {
            return Err::<EmptyReader, _>(
                Neo4jErrorHelper::invalid_state()
                    .message("No query set")
                    .to_adbc(),
            );
        }
        Err::<EmptyReader, _>(
            Neo4jErrorHelper::not_implemented()
                .message("query execution")
                .to_adbc(),
        )
    }

    fn execute_update(&mut self) -> Result<Option<i64>> {
        self.execute().map(|_| None)
    }

    fn execute_schema(&mut self) -> Result<Schema> {
        let reader = self.execute()?;
        Ok((*reader.schema()).clone())
    }

    fn execute_partitions(&mut self) -> Result<adbc_core::PartitionedResult> {
        Err(Neo4jErrorHelper::not_implemented()
            .message("execute_partitions")
            .to_adbc())
    }

    fn cancel(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adbc_core::error::Status;
    use adbc_core::Statement as _;

    #[test]
    fn test_set_sql_query() {
        let mut statement = Statement::new();
        statement.set_sql_query("MATCH (n) RETURN count(n)").unwrap();
        assert_eq!(statement.sql_query(), Some("MATCH (n) RETURN count(n)"));
    }

    #[test]
    fn test_execute_without_query() {
        let mut statement = Statement::new();
        let err = statement.execute().err().unwrap();
        assert_eq!(err.status, Status::InvalidState);
    }

    #[test]
    fn test_execute_not_supported() {
        let mut statement = Statement::new();
        statement.set_sql_query("RETURN 1").unwrap();
        assert_eq!(
            statement.execute_update().unwrap_err().status,
            Status::NotImplemented
        );
    }
}
