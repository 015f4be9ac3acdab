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

//! Builds [`DatabaseMetadata`] from a live connection.

use crate::connection::Connection;
use crate::error::Result;
use crate::metadata::DatabaseMetadata;
use tracing::debug;

/// Resolve the metadata snapshot for `connection`.
///
/// The server version is asked for only when there is a connection and it has
/// an executor; otherwise the version stays unknown and no request is made.
/// A failing version query is returned as the error of this call.
pub fn resolve(connection: Option<&Connection>) -> Result<DatabaseMetadata> {
    let database_version = connection
        .and_then(|conn| conn.executor().map(|executor| (conn, executor)))
        .map(|(conn, executor)| conn.block_on(executor.server_version()).and_then(|v| v))
        .transpose()?;

    match &database_version {
        Some(version) => debug!("Resolved server version: {}", version),
        None => debug!("No executor available, server version unknown"),
    }

    let metadata = DatabaseMetadata::new(database_version);
    Ok(match connection {
        Some(conn) => metadata
            .with_url(conn.uri())
            .with_user_name(conn.user().map(str::to_string)),
        None => metadata,
    })
}
