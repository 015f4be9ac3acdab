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

//! Description of the database a connection talks to.

pub const DATABASE_PRODUCT_NAME: &str = "Neo4j";
pub const DRIVER_NAME: &str = "Neo4j HTTP ADBC Driver";

/// Snapshot describing the connected database.
///
/// Built once per connection and never mutated afterwards. The server version
/// is whatever the server reported, stored verbatim; `None` means it was not
/// known when the snapshot was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseMetadata {
    database_version: Option<String>,
    url: Option<String>,
    user_name: Option<String>,
}

impl DatabaseMetadata {
    pub fn new(database_version: Option<String>) -> Self {
        Self {
            database_version,
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_user_name(mut self, user_name: Option<String>) -> Self {
        self.user_name = user_name;
        self
    }

    pub fn database_product_name(&self) -> &'static str {
        DATABASE_PRODUCT_NAME
    }

    /// Server version as reported by the server.
    pub fn database_product_version(&self) -> Option<&str> {
        self.database_version.as_deref()
    }

    pub fn database_major_version(&self) -> Option<u32> {
        self.database_version
            .as_deref()
            .and_then(|v| version_component(v, 0))
    }

    pub fn database_minor_version(&self) -> Option<u32> {
        self.database_version
            .as_deref()
            .and_then(|v| version_component(v, 1))
    }

    pub fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }

    pub fn driver_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn driver_major_version(&self) -> u32 {
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default()
    }

    pub fn driver_minor_version(&self) -> u32 {
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }
}

/// Numeric component `index` of a dotted version such as `5.13.0-enterprise`.
///
/// Reads the leading digits of the component, so `0-enterprise` yields `0`.
fn version_component(version: &str, index: usize) -> Option<u32> {
    let component = version.trim().split('.').nth(index)?;
    let digits: String = component
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
