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

//! Neo4j HTTP discovery document.
//!
//! Returned by `GET /` on Neo4j 4.x/5.x and by `GET /db/data/` on 3.x.
//! Only the fields the driver reads are typed; everything else is ignored.

use serde::Deserialize;

/// Discovery API response.
///
/// ```json
/// {
///   "bolt_direct": "neo4j://localhost:7687",
///   "transaction": "http://localhost:7474/db/{databaseName}/tx",
///   "neo4j_version": "4.4.3",
///   "neo4j_edition": "community"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryDocument {
    #[serde(default)]
    pub neo4j_version: Option<String>,
    #[serde(default)]
    pub neo4j_edition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modern_discovery() {
        let body = r#"{
            "bolt_routing": "neo4j://localhost:7687",
            "transaction": "http://localhost:7474/db/{databaseName}/tx",
            "bolt_direct": "bolt://localhost:7687",
            "neo4j_version": "4.4.3",
            "neo4j_edition": "community"
        }"#;
        let doc: DiscoveryDocument = serde_json::from_str(body).unwrap();
        assert_eq!(doc.neo4j_version.as_deref(), Some("4.4.3"));
        assert_eq!(doc.neo4j_edition.as_deref(), Some("community"));
    }

    #[test]
    fn test_parse_legacy_service_root() {
        // 3.x /db/data/ carries many link fields the driver does not model.
        let body = r#"{
            "extensions": {},
            "node": "http://localhost:7474/db/data/node",
            "transaction": "http://localhost:7474/db/data/transaction",
            "neo4j_version": "3.5.35"
        }"#;
        let doc: DiscoveryDocument = serde_json::from_str(body).unwrap();
        assert_eq!(doc.neo4j_version.as_deref(), Some("3.5.35"));
        assert!(doc.neo4j_edition.is_none());
    }

    #[test]
    fn test_parse_without_version() {
        let body = r#"{"management": "http://localhost:7474/db/manage/"}"#;
        let doc: DiscoveryDocument = serde_json::from_str(body).unwrap();
        assert!(doc.neo4j_version.is_none());
    }
}
